//! Infrastructure layer: everything that touches the OS.
//!
//! Contains the device sources and their multiplexer, scanner discovery, the
//! process restarter, the privilege check, console output, config files, and
//! the tokio runtime itself.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `piscan_core`, but the core crate never depends on it.

pub mod console;
pub mod device;
pub mod discovery;
pub mod multiplexer;
pub mod privilege;
pub mod restart;
pub mod runtime;
pub mod storage;
