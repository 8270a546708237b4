//! The scan session: decoder, dispatcher and supervisor driven as one loop.
//!
//! [`ScanSession`] is the explicit context object for a listening run.  It is
//! built once in `main` and owns everything the pipeline needs:
//!
//! ```text
//!  RunningMultiplexer::next_event()
//!        │ RawKeyEvent
//!        ▼
//!  KeyDecoder::accept() ──► Some(scan) ──► CallbackDispatcher::dispatch()
//!        │
//!        └── DeviceLost ──► Restarter::restart()
//! ```
//!
//! The loop runs on a single task, so the decoder's per-device buffers are
//! never touched concurrently and every flush (decode, dispatch, clear)
//! finishes before the next event is looked at.

use std::future::Future;
use std::sync::{atomic::AtomicBool, Arc};

use piscan_core::{DecoderConfig, KeyDecoder, RawKeyEvent};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::dispatch::{CallbackDispatcher, DispatchOutcome, ScanHandler};
use crate::application::supervisor::{RestartError, Restarter};
use crate::infrastructure::multiplexer::{DeviceMultiplexer, MultiplexError};

/// Fatal outcomes of a listening run.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("You must be root to listen for scanners!")]
    NotRoot,

    #[error("No scanners found. Exiting...")]
    NoDevices,

    #[error(transparent)]
    Multiplex(#[from] MultiplexError),

    #[error("device lost and restart failed: {0}")]
    Restart(#[from] RestartError),
}

/// How a listening run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The shutdown future resolved (Ctrl-C).
    Interrupted,
    /// A device was lost and the restarter returned without replacing the
    /// process.  Only test doubles do this.
    Restarted,
    /// Every device source closed on its own.
    SourcesClosed,
}

/// Owns the decoder, dispatcher and restarter for one listening run.
pub struct ScanSession {
    decoder: KeyDecoder,
    dispatcher: CallbackDispatcher,
    restarter: Arc<dyn Restarter>,
}

impl ScanSession {
    pub fn new(
        config: DecoderConfig,
        handler: Arc<dyn ScanHandler>,
        restarter: Arc<dyn Restarter>,
    ) -> Self {
        Self {
            decoder: KeyDecoder::new(config),
            dispatcher: CallbackDispatcher::new(handler),
            restarter,
        }
    }

    pub fn decoder(&self) -> &KeyDecoder {
        &self.decoder
    }

    /// Feeds one event to the decoder and dispatches the scan it completes,
    /// if any.
    pub fn process_event(&mut self, event: RawKeyEvent) -> Option<JoinHandle<DispatchOutcome>> {
        let device = event.device_id.clone();
        let scan = self.decoder.accept(event)?;
        debug!(device = %device, "scan complete");
        Some(self.dispatcher.dispatch(scan))
    }

    /// Grabs `devices`, then decodes and dispatches until `shutdown`
    /// resolves, a device is lost, or every source closes.
    ///
    /// On device loss the readers are stopped, `Device unplugged,
    /// restarting....` is logged, and the restarter is invoked.  In
    /// production that call replaces the process and never returns.
    ///
    /// # Errors
    ///
    /// - [`ListenError::NoDevices`] if `devices` is empty.
    /// - [`ListenError::Multiplex`] if a grab or thread spawn fails.
    /// - [`ListenError::Restart`] if the restart itself fails.
    pub async fn listen<F>(
        &mut self,
        devices: DeviceMultiplexer,
        shutdown: F,
    ) -> Result<SessionEnd, ListenError>
    where
        F: Future<Output = ()>,
    {
        if devices.is_empty() {
            return Err(ListenError::NoDevices);
        }

        let running = Arc::new(AtomicBool::new(true));
        let mut mux = devices.start(running)?;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutdown requested");
                    mux.stop();
                    return Ok(SessionEnd::Interrupted);
                }

                next = mux.next_event() => match next {
                    Ok(event) => {
                        // Outcome is logged by the dispatcher; nobody waits on it.
                        let _ = self.process_event(event);
                    }
                    Err(MultiplexError::DeviceLost { device_id, source }) => {
                        mux.stop();
                        warn!(device = %device_id, error = %source, "Device unplugged, restarting....");
                        self.restarter.restart()?;
                        return Ok(SessionEnd::Restarted);
                    }
                    Err(MultiplexError::AllSourcesClosed) => {
                        info!("all device sources closed");
                        return Ok(SessionEnd::SourcesClosed);
                    }
                    Err(other) => return Err(other.into()),
                },
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
