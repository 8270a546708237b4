//! Device sources: where raw key events come from.
//!
//! On Linux, a scanner is an evdev node under `/dev/input/` (see `linux`).
//! Reading it is a blocking call, so every source is driven from its own OS
//! thread by the
//! [`DeviceMultiplexer`](crate::infrastructure::multiplexer::DeviceMultiplexer).
//!
//! # Testability
//!
//! The [`DeviceSource`] trait allows unit tests to script key events and
//! failures without real hardware; see [`mock::MockDeviceSource`].

use std::path::PathBuf;

use piscan_core::{DeviceId, DeviceInfo, RawKeyEvent};

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

/// Error type for device source operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to open input device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to grab device for exclusive use: {0}")]
    Grab(#[source] std::io::Error),
    #[error("failed to read from device: {0}")]
    Read(#[source] std::io::Error),
    /// The source has no more events and never will.  Not a failure.
    #[error("device source closed")]
    Closed,
}

/// A single input device that produces key events.
///
/// The production implementation wraps an evdev node; tests use
/// [`mock::MockDeviceSource`].
pub trait DeviceSource: Send + 'static {
    /// Stable identity of this device for the session.
    fn id(&self) -> &DeviceId;

    /// Human-readable name and USB identity.
    fn info(&self) -> &DeviceInfo;

    /// Takes exclusive ownership of the device so no other reader (including
    /// the console) sees its key presses.
    fn grab(&mut self) -> Result<(), DeviceError>;

    /// Blocks until the next key event is available.
    ///
    /// Returns [`DeviceError::Closed`] once the source is exhausted; any other
    /// error means the device is gone.
    fn read_event(&mut self) -> Result<RawKeyEvent, DeviceError>;
}
