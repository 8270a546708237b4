//! # piscan-core
//!
//! Shared library for PiScan containing the key event model, the keystroke
//! decoder, and the Linux key-name table.
//!
//! It has zero dependencies on OS APIs, device nodes, threads, or async
//! runtimes; everything here is plain data and pure functions.
//!
//! # Architecture overview (for beginners)
//!
//! PiScan turns a Linux box with one or more USB barcode scanners into a
//! headless scanning station.  A scanner looks like a keyboard to the
//! kernel: every barcode arrives as a burst of key presses ending in
//! `Enter`.  PiScan grabs the scanners so nothing else sees those key
//! presses, decodes each burst back into text, and hands the text to a
//! callback.
//!
//! This crate is the part of that pipeline that does not touch hardware:
//!
//! - **`domain`** – Events (`RawKeyEvent`), device identity (`DeviceId`),
//!   and the compatible-scanner filter (`ScannerId`).
//!
//! - **`decoder`** – The per-device buffering automaton (`KeyDecoder`) and
//!   the decode pass that applies shift / caps lock / backspace rules.
//!
//! - **`keymap`** – Translation from Linux `KEY_*` codes to the key names the
//!   decoder understands.

pub mod decoder;
pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `piscan_core::KeyDecoder` instead of `piscan_core::decoder::KeyDecoder`.
pub use decoder::{decode_typed_string, DecoderConfig, KeyDecoder, DEFAULT_SEPARATORS};
pub use domain::{
    is_compatible, DeviceId, DeviceInfo, KeyEventType, RawKeyEvent, ScannerId, DEFAULT_SCANNERS,
};
