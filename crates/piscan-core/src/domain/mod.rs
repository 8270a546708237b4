//! Domain entities for PiScan.
//!
//! This module contains pure data types with no infrastructure dependencies.
//!
//! # What lives here? (for beginners)
//!
//! The innermost layer of the workspace describes *what* the program talks
//! about, not *how* it talks to the kernel:
//!
//! - A [`RawKeyEvent`] is one key going down or up on one device.
//! - A [`DeviceId`] names the device an event came from.
//! - A [`DeviceInfo`] describes a device for discovery and reporting.
//! - A [`ScannerId`] is a (vendor, product) pair that marks a device as an
//!   accepted barcode scanner.
//!
//! None of these types know about `/dev/input`, evdev, threads, or tokio.
//! That keeps them testable on any platform.

/// Device identity, description, and compatible-scanner filter.
pub mod device;

/// Raw key events as produced by a device source.
pub mod event;

pub use device::{is_compatible, DeviceId, DeviceInfo, ScannerId, DEFAULT_SCANNERS};
pub use event::{KeyEventType, RawKeyEvent};
