//! Device identity and the compatible-scanner filter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an input device for the lifetime of a session.
///
/// For evdev sources this is the device node path (e.g. `/dev/input/event3`).
/// Buffers in the decoder are keyed by this value, so two devices must never
/// share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Descriptive information about a device, used for filtering and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable name reported by the kernel driver.
    pub name: String,
    /// USB vendor id.
    pub vendor_id: u16,
    /// USB product id.
    pub product_id: u16,
}

impl DeviceInfo {
    /// Formats the `vendor:product` address the way `lsusb` prints it.
    pub fn address(&self) -> String {
        format!("{:x}:{:x}", self.vendor_id, self.product_id)
    }

    /// Returns the [`ScannerId`] this device would match against.
    pub fn scanner_id(&self) -> ScannerId {
        ScannerId {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
        }
    }
}

/// A (vendor, product) pair identifying an accepted barcode scanner model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannerId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl ScannerId {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    /// Returns `true` if `info` describes a device of this model.
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        self.vendor_id == info.vendor_id && self.product_id == info.product_id
    }
}

/// Scanner models accepted when the configuration does not list any.
pub const DEFAULT_SCANNERS: [ScannerId; 2] = [
    ScannerId::new(0x2DD6, 0x2A61),
    ScannerId::new(0x05E0, 0x1200),
];

/// Returns `true` if `info` matches any entry in `compatible`.
pub fn is_compatible(info: &DeviceInfo, compatible: &[ScannerId]) -> bool {
    compatible.iter().any(|scanner| scanner.matches(info))
}
