//! Integration tests for the scan pipeline.
//!
//! These tests exercise the piscan library end-to-end:
//! mock device sources → `DeviceMultiplexer` → `ScanSession` (decoder,
//! dispatcher) → recording handler, plus the restart path on device loss.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use piscan::application::dispatch::ScanHandler;
use piscan::application::session::{ScanSession, SessionEnd};
use piscan::application::supervisor::{RestartError, Restarter};
use piscan::infrastructure::device::mock::MockDeviceSource;
use piscan::infrastructure::multiplexer::DeviceMultiplexer;
use piscan::infrastructure::restart::ProcessImage;
use piscan::infrastructure::storage::config::ScanConfig;
use tokio::sync::{mpsc, oneshot};

const WAIT: Duration = Duration::from_secs(5);

// ── Test doubles ──────────────────────────────────────────────────────────────

/// Records scans and pings the test after each one.
struct RecordingHandler {
    scans: Mutex<Vec<String>>,
    notify: mpsc::UnboundedSender<String>,
}

impl RecordingHandler {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (notify, rx) = mpsc::unbounded_channel();
        let handler = Arc::new(Self {
            scans: Mutex::new(Vec::new()),
            notify,
        });
        (handler, rx)
    }

    fn scans(&self) -> Vec<String> {
        self.scans.lock().expect("lock poisoned").clone()
    }
}

impl ScanHandler for RecordingHandler {
    fn handle_scan(&self, scan: &str) -> anyhow::Result<()> {
        self.scans.lock().expect("lock poisoned").push(scan.to_string());
        let _ = self.notify.send(scan.to_string());
        if scan == "fail" {
            anyhow::bail!("downstream rejected {scan}");
        }
        Ok(())
    }
}

/// Records the process image it was asked to replay instead of exec-ing it.
struct RecordingRestarter {
    image: ProcessImage,
    requests: Mutex<Vec<ProcessImage>>,
}

impl Restarter for RecordingRestarter {
    fn restart(&self) -> Result<(), RestartError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(self.image.clone());
        Ok(())
    }
}

fn recording_restarter() -> Arc<RecordingRestarter> {
    Arc::new(RecordingRestarter {
        image: ProcessImage::capture().expect("capture process image"),
        requests: Mutex::new(Vec::new()),
    })
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for scan")
        .expect("handler dropped")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_scanners_scanning_concurrently_yield_both_scans() {
    // Arrange
    let (x_source, x) = MockDeviceSource::new("/dev/input/event3");
    let (y_source, y) = MockDeviceSource::new("/dev/input/event4");
    let mut devices = DeviceMultiplexer::new();
    devices.add_source(x_source);
    devices.add_source(y_source);

    let (handler, mut scans_rx) = RecordingHandler::new();
    let mut session = ScanSession::new(
        ScanConfig::default().decoder_config(),
        handler.clone(),
        recording_restarter(),
    );
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    // Act: both devices type from their own threads at the same time.
    let listener = async {
        session
            .listen(devices, async {
                let _ = stop_rx.await;
            })
            .await
    };
    // Typists get clones so the sources stay open until the test ends.
    let (x_typist, y_typist) = (x.clone(), y.clone());
    let driver = async {
        let tx = tokio::task::spawn_blocking(move || x_typist.scan("ab", "enter"));
        let ty = tokio::task::spawn_blocking(move || y_typist.scan("cd", "tab"));
        tx.await.expect("x typist");
        ty.await.expect("y typist");

        let mut got = vec![recv(&mut scans_rx).await, recv(&mut scans_rx).await];
        got.sort();
        stop_tx.send(()).expect("listener alive");
        got
    };
    let (result, got) = tokio::join!(listener, driver);

    // Assert
    assert_eq!(result.expect("listen"), SessionEnd::Interrupted);
    assert_eq!(got, vec!["ab".to_string(), "cd".to_string()]);
    let mut recorded = handler.scans();
    recorded.sort();
    assert_eq!(recorded, vec!["ab".to_string(), "cd".to_string()]);
    assert!(x.is_grabbed() && y.is_grabbed());
}

#[tokio::test]
async fn test_failing_handler_does_not_stop_later_scans() {
    // Arrange
    let (source, device) = MockDeviceSource::new("/dev/input/event3");
    let mut devices = DeviceMultiplexer::new();
    devices.add_source(source);
    let (handler, mut scans_rx) = RecordingHandler::new();
    let mut session = ScanSession::new(
        ScanConfig::default().decoder_config(),
        handler.clone(),
        recording_restarter(),
    );
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    // Act
    let listener = async {
        session
            .listen(devices, async {
                let _ = stop_rx.await;
            })
            .await
    };
    let driver = async {
        device.scan("fail", "enter");
        device.scan("Next1", "enter");
        let first = recv(&mut scans_rx).await;
        let second = recv(&mut scans_rx).await;
        stop_tx.send(()).expect("listener alive");
        (first, second)
    };
    let (result, (first, second)) = tokio::join!(listener, driver);

    // Assert
    assert_eq!(result.expect("listen"), SessionEnd::Interrupted);
    assert_eq!(first, "fail");
    assert_eq!(second, "Next1");
}

#[tokio::test]
async fn test_device_loss_requests_restart_with_captured_image() {
    // Arrange
    let (source, device) = MockDeviceSource::new("/dev/input/event3");
    let mut devices = DeviceMultiplexer::new();
    devices.add_source(source);
    let (handler, _scans_rx) = RecordingHandler::new();
    let restarter = recording_restarter();
    let mut session = ScanSession::new(
        ScanConfig::default().decoder_config(),
        handler,
        restarter.clone(),
    );

    // Act
    device.fail("device unplugged");
    let result = tokio::time::timeout(WAIT, session.listen(devices, std::future::pending()))
        .await
        .expect("listen returned");

    // Assert
    assert_eq!(result.expect("listen"), SessionEnd::Restarted);
    let requests = restarter.requests.lock().expect("lock poisoned").clone();
    assert_eq!(requests.len(), 1);

    let image = &requests[0];
    assert_eq!(image.program, std::env::current_exe().expect("current exe"));
    assert_eq!(image.args, std::env::args_os().collect::<Vec<_>>());

    let cmd = image.command();
    assert_eq!(cmd.get_program(), image.program.as_os_str());
    assert_eq!(cmd.get_args().count(), image.args.len().saturating_sub(1));
    assert_eq!(cmd.get_envs().count(), image.env.len());
}

#[tokio::test]
async fn test_custom_separator_from_config() {
    // Arrange
    let (source, device) = MockDeviceSource::new("/dev/input/event3");
    let mut devices = DeviceMultiplexer::new();
    devices.add_source(source);
    let (handler, mut scans_rx) = RecordingHandler::new();
    let config = ScanConfig::default().with_overrides(None, vec!["f12".to_string()]);
    let mut session = ScanSession::new(config.decoder_config(), handler, recording_restarter());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    // Act
    let listener = async {
        session
            .listen(devices, async {
                let _ = stop_rx.await;
            })
            .await
    };
    let driver = async {
        // With enter no longer a separator, the first scan runs into the second.
        device.scan("12", "enter");
        device.scan("34", "f12");
        let scan = recv(&mut scans_rx).await;
        stop_tx.send(()).expect("listener alive");
        scan
    };
    let (result, scan) = tokio::join!(listener, driver);

    // Assert
    assert_eq!(result.expect("listen"), SessionEnd::Interrupted);
    assert_eq!(scan, "1234");
}
