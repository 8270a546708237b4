//! Application layer use cases for the scanner listener.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules, here `piscan_core`) and the infrastructure (devices, files,
//! processes).  Use cases in this layer orchestrate domain objects and depend
//! on traits (`ScanHandler`, `Restarter`) rather than concrete OS code, so
//! tests can swap the infrastructure out.
//!
//! # Sub-modules
//!
//! - **`session`**    – The listening loop: merged events in, decoded scans
//!   out, restart on device loss.
//! - **`dispatch`**   – Runs the user's scan handler on an isolated task per
//!   scan so a slow handler never stalls the scanners.
//! - **`supervisor`** – The `Restarter` capability and its error type.

pub mod dispatch;
pub mod session;
pub mod supervisor;
