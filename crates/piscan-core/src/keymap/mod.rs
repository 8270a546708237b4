//! Key code translation tables.
//!
//! Device sources report platform key codes; the decoder works on key names.
//! Translation happens once, at the source boundary.

pub mod linux_evdev;

pub use linux_evdev::{code_to_name, key_event_type, key_name};
