//! Raw key events.

use super::device::DeviceId;

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventType {
    Down,
    Up,
}

/// One key transition on one device.
///
/// Events are immutable once produced. Ordering is only meaningful between
/// events of the same device; the interleaving of two devices in the merged
/// stream is whatever order their reads completed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// The device that produced this event.
    pub device_id: DeviceId,
    /// Key name as understood by the decoder (`"a"`, `"enter"`, `"left shift"`).
    pub key_name: String,
    /// Key-down or key-up.
    pub event_type: KeyEventType,
}

impl RawKeyEvent {
    pub fn new(
        device_id: impl Into<DeviceId>,
        key_name: impl Into<String>,
        event_type: KeyEventType,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            key_name: key_name.into(),
            event_type,
        }
    }

    /// Shorthand for a key-down event.
    pub fn down(device_id: impl Into<DeviceId>, key_name: impl Into<String>) -> Self {
        Self::new(device_id, key_name, KeyEventType::Down)
    }

    /// Shorthand for a key-up event.
    pub fn up(device_id: impl Into<DeviceId>, key_name: impl Into<String>) -> Self {
        Self::new(device_id, key_name, KeyEventType::Up)
    }

    pub fn is_down(&self) -> bool {
        self.event_type == KeyEventType::Down
    }

    pub fn is_up(&self) -> bool {
        self.event_type == KeyEventType::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_constructor_sets_event_type() {
        let event = RawKeyEvent::down("dev0", "a");
        assert!(event.is_down());
        assert!(!event.is_up());
        assert_eq!(event.key_name, "a");
        assert_eq!(event.device_id, DeviceId::from("dev0"));
    }

    #[test]
    fn test_up_constructor_sets_event_type() {
        let event = RawKeyEvent::up("dev0", "enter");
        assert_eq!(event.event_type, KeyEventType::Up);
    }
}
