//! Scanner discovery: find input devices and keep the compatible ones.
//!
//! Every `/dev/input/event*` node is opened and its USB vendor/product pair
//! compared against the configured scanner list.  Keyboards, mice, power
//! buttons and everything else are skipped with an `Ignoring '<name>'.`
//! line so the operator can see what was considered.

use piscan_core::{is_compatible, ScannerId};
use tracing::{debug, info};

use crate::infrastructure::device::DeviceSource;
use crate::infrastructure::multiplexer::DeviceMultiplexer;

/// Builds a multiplexer from the candidates that match `compatible`.
pub fn select_compatible<S, I>(candidates: I, compatible: &[ScannerId]) -> DeviceMultiplexer
where
    S: DeviceSource,
    I: IntoIterator<Item = S>,
{
    let mut devices = DeviceMultiplexer::new();
    for candidate in candidates {
        let info = candidate.info();
        if is_compatible(info, compatible) {
            debug!(device = %candidate.id(), address = %info.address(), "compatible scanner");
            devices.add_source(candidate);
        } else {
            info!("Ignoring '{}'.", info.name);
        }
    }
    devices
}

/// Enumerates the system's evdev nodes and keeps the compatible scanners.
#[cfg(target_os = "linux")]
pub fn discover_scanners(compatible: &[ScannerId]) -> DeviceMultiplexer {
    use crate::infrastructure::device::linux::EvdevSource;

    let candidates =
        evdev::enumerate().map(|(path, device)| EvdevSource::from_device(path, device));
    select_compatible(candidates, compatible)
}

/// Scanners are evdev devices; other platforms have none to offer.
#[cfg(not(target_os = "linux"))]
pub fn discover_scanners(_compatible: &[ScannerId]) -> DeviceMultiplexer {
    tracing::warn!("scanner discovery is only supported on Linux");
    DeviceMultiplexer::new()
}
