//! evdev-backed device source for Linux.
//!
//! # How evdev works (for beginners)
//!
//! The kernel exposes every input device as a character device under
//! `/dev/input/eventN`.  Reading it yields `input_event` structs: a type
//! (`EV_KEY`, `EV_SYN`, `EV_MSC`, ...), a code (`KEY_A` = 30), and a value
//! (0 = release, 1 = press, 2 = auto-repeat).  The `evdev` crate wraps the
//! ioctls and reads; `fetch_events` blocks until at least one complete
//! `SYN_REPORT` frame is available and returns every event in it.
//!
//! A scanner frame usually holds one key transition plus an `EV_MSC` scan
//! code, so the source keeps a small queue and hands key events out one at a
//! time.
//!
//! `EVIOCGRAB` gives this process exclusive access: while held, the console
//! and any display server stop seeing the scanner's key presses.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use evdev::{Device, InputEventKind};
use tracing::debug;

use piscan_core::keymap::{key_event_type, key_name};
use piscan_core::{DeviceId, DeviceInfo, RawKeyEvent};

use super::{DeviceError, DeviceSource};

/// A [`DeviceSource`] reading from one `/dev/input/eventN` node.
pub struct EvdevSource {
    id: DeviceId,
    info: DeviceInfo,
    device: Device,
    pending: VecDeque<RawKeyEvent>,
}

impl EvdevSource {
    /// Opens the evdev node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Open`] if the node cannot be opened (usually a
    /// permissions problem or a device that vanished).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let device = Device::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_device(path.to_path_buf(), device))
    }

    /// Wraps an already-open device, e.g. one yielded by `evdev::enumerate`.
    pub fn from_device(path: PathBuf, device: Device) -> Self {
        let input_id = device.input_id();
        let info = DeviceInfo {
            name: device.name().unwrap_or("unknown device").to_string(),
            vendor_id: input_id.vendor(),
            product_id: input_id.product(),
        };
        Self {
            id: DeviceId::new(path.to_string_lossy()),
            info,
            device,
            pending: VecDeque::new(),
        }
    }
}

impl DeviceSource for EvdevSource {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn grab(&mut self) -> Result<(), DeviceError> {
        self.device.grab().map_err(DeviceError::Grab)
    }

    fn read_event(&mut self) -> Result<RawKeyEvent, DeviceError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            let events = self.device.fetch_events().map_err(DeviceError::Read)?;
            for ev in events {
                let InputEventKind::Key(key) = ev.kind() else {
                    continue;
                };
                match key_event_type(ev.value()) {
                    Some(event_type) => self.pending.push_back(RawKeyEvent::new(
                        self.id.clone(),
                        key_name(key.code()),
                        event_type,
                    )),
                    None => debug!(device = %self.id, value = ev.value(), "ignoring key event value"),
                }
            }
        }
    }
}
