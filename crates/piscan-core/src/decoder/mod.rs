//! Keystroke decoder: per-device buffers and scan-boundary detection.
//!
//! The [`KeyDecoder`] consumes the merged event stream of every device, one
//! event at a time.  Each device has its own pending buffer.  When a device
//! releases a separator key (`enter` or `tab` by default) its buffer is run
//! through [`decode_typed_string`], cleared, and the decoded text is returned
//! to the caller as a completed scan.
//!
//! ```text
//!  merged stream ─► accept(event) ─┬─ not a separator-up ─► push to buffer[device]
//!                                  └─ separator-up ───────► decode(buffer[device])
//!                                                           clear(buffer[device])
//!                                                           return Some(scan) if non-empty
//! ```
//!
//! The decoder is deliberately synchronous and owns its buffers outright; the
//! caller drives it from a single task, so no locking is needed.

pub mod shift;
pub mod typed;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{DeviceId, RawKeyEvent};

pub use typed::{decode_typed_string, BACKSPACE_KEY_NAME};

/// Separator keys used when none are configured.
pub const DEFAULT_SEPARATORS: [&str; 2] = ["enter", "tab"];

/// Settings for a [`KeyDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Key names whose key-up ends the current scan.
    pub separators: HashSet<String>,
    /// Whether backspace deletes the previous character.
    pub allow_backspace: bool,
}

impl DecoderConfig {
    /// Builds a config with the given separators and backspace enabled.
    pub fn with_separators<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators.into_iter().map(Into::into).collect(),
            allow_backspace: true,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::with_separators(DEFAULT_SEPARATORS)
    }
}

/// Buffers key events per device and emits a decoded scan on each separator.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    config: DecoderConfig,
    buffers: HashMap<DeviceId, Vec<RawKeyEvent>>,
}

impl KeyDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            buffers: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns `true` if `key_name` is a configured separator.
    pub fn is_separator(&self, key_name: &str) -> bool {
        self.config.separators.contains(key_name)
    }

    /// Feeds one event into the decoder.
    ///
    /// Returns `Some(scan)` when `event` is the release of a separator key and
    /// the device's buffer decodes to non-empty text.  The device's buffer is
    /// cleared on every separator release, whether or not text was produced.
    /// Other devices' buffers are never touched.
    pub fn accept(&mut self, event: RawKeyEvent) -> Option<String> {
        let is_flush = event.is_up() && self.is_separator(&event.key_name);
        let buffer = self.buffers.entry(event.device_id.clone()).or_default();

        if !is_flush {
            buffer.push(event);
            return None;
        }

        let scan = decode_typed_string(buffer, self.config.allow_backspace);
        buffer.clear();
        debug!(device = %event.device_id, chars = scan.chars().count(), "flushed scan buffer");

        if scan.is_empty() {
            None
        } else {
            Some(scan)
        }
    }

    /// Returns the events buffered for `device` since its last flush.
    pub fn pending(&self, device: &DeviceId) -> &[RawKeyEvent] {
        self.buffers.get(device).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of devices that have produced at least one event.
    pub fn tracked_devices(&self) -> usize {
        self.buffers.len()
    }
}
