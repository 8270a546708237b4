//! Scripted device source for tests.
//!
//! A [`MockDeviceSource`] is paired with a [`MockDeviceHandle`].  The test
//! keeps the handle and uses it to type keys or simulate an unplug; the
//! source goes to the multiplexer like any real device.  Dropping the handle
//! closes the source.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
    Arc,
};

use piscan_core::{DeviceId, DeviceInfo, RawKeyEvent};

use super::{DeviceError, DeviceSource};

enum Scripted {
    Event(RawKeyEvent),
    Fail(String),
}

/// A [`DeviceSource`] whose events are supplied by a [`MockDeviceHandle`].
pub struct MockDeviceSource {
    id: DeviceId,
    info: DeviceInfo,
    rx: Receiver<Scripted>,
    grabbed: Arc<AtomicBool>,
    fail_grab: Arc<AtomicBool>,
}

/// Test-side controller for a [`MockDeviceSource`].
#[derive(Clone)]
pub struct MockDeviceHandle {
    id: DeviceId,
    tx: Sender<Scripted>,
    grabbed: Arc<AtomicBool>,
    fail_grab: Arc<AtomicBool>,
}

impl MockDeviceSource {
    /// Creates a source named after `id` with the first default scanner's
    /// vendor/product pair.
    pub fn new(id: impl Into<DeviceId>) -> (Self, MockDeviceHandle) {
        let id = id.into();
        let info = DeviceInfo {
            name: format!("Mock Scanner {id}"),
            vendor_id: 0x2DD6,
            product_id: 0x2A61,
        };
        Self::with_info(id, info)
    }

    pub fn with_info(id: impl Into<DeviceId>, info: DeviceInfo) -> (Self, MockDeviceHandle) {
        let id = id.into();
        let (tx, rx) = mpsc::channel();
        let grabbed = Arc::new(AtomicBool::new(false));
        let fail_grab = Arc::new(AtomicBool::new(false));
        let source = Self {
            id: id.clone(),
            info,
            rx,
            grabbed: Arc::clone(&grabbed),
            fail_grab: Arc::clone(&fail_grab),
        };
        let handle = MockDeviceHandle {
            id,
            tx,
            grabbed,
            fail_grab,
        };
        (source, handle)
    }
}

impl DeviceSource for MockDeviceSource {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn grab(&mut self) -> Result<(), DeviceError> {
        if self.fail_grab.load(Ordering::SeqCst) {
            return Err(DeviceError::Grab(std::io::Error::new(
                std::io::ErrorKind::ResourceBusy,
                "device is grabbed by another process",
            )));
        }
        self.grabbed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn read_event(&mut self) -> Result<RawKeyEvent, DeviceError> {
        match self.rx.recv() {
            Ok(Scripted::Event(event)) => Ok(event),
            Ok(Scripted::Fail(msg)) => Err(DeviceError::Read(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                msg,
            ))),
            Err(_) => Err(DeviceError::Closed),
        }
    }
}

impl MockDeviceHandle {
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Queues a key-down for `key_name`.
    pub fn press(&self, key_name: &str) {
        self.send(Scripted::Event(RawKeyEvent::down(self.id.clone(), key_name)));
    }

    /// Queues a key-up for `key_name`.
    pub fn release(&self, key_name: &str) {
        self.send(Scripted::Event(RawKeyEvent::up(self.id.clone(), key_name)));
    }

    /// Queues a press and release of `key_name`.
    pub fn tap(&self, key_name: &str) {
        self.press(key_name);
        self.release(key_name);
    }

    /// Types `text` the way a scanner would, then taps `separator`.
    ///
    /// Uppercase letters are wrapped in a left shift press.
    pub fn scan(&self, text: &str, separator: &str) {
        for c in text.chars() {
            let upper = c.is_ascii_uppercase();
            if upper {
                self.press("left shift");
            }
            match c {
                ' ' => self.tap("space"),
                c => self.tap(&c.to_ascii_lowercase().to_string()),
            }
            if upper {
                self.release("left shift");
            }
        }
        self.tap(separator);
    }

    /// Makes the next read fail as if the device was unplugged.
    pub fn fail(&self, message: &str) {
        self.send(Scripted::Fail(message.to_string()));
    }

    /// Makes the next grab attempt fail.
    pub fn fail_grab(&self) {
        self.fail_grab.store(true, Ordering::SeqCst);
    }

    /// Whether the source has been grabbed.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed.load(Ordering::SeqCst)
    }

    fn send(&self, item: Scripted) {
        // The source may already have been dropped by a finished reader;
        // scripted input after that point is irrelevant.
        let _ = self.tx.send(item);
    }
}
