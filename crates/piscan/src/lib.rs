//! piscan library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//! The library never installs a tracing subscriber; that is the binary's job.

pub mod application;
pub mod infrastructure;
