//! The tokio runtime the listener runs on.
//!
//! Scan handlers run on the blocking pool and nobody joins them, so two
//! properties matter here:
//!
//! - The pool is sized well past tokio's default of 512 threads, so a burst
//!   of slow handlers is limited by the OS rather than by the pool.
//! - Leaving the runtime never waits for handlers still in flight.  A
//!   handler stuck on a network call must not keep the process alive after
//!   Ctrl-C.

use std::future::Future;

use tokio::runtime::Runtime;

/// Upper bound on blocking-pool threads.  Threads are spawned on demand and
/// retired when idle, so the bound costs nothing until it is used.
pub const MAX_BLOCKING_THREADS: usize = 65_536;

/// Builds the multi-threaded runtime with every driver enabled.
pub fn build_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("piscan-worker")
        .max_blocking_threads(MAX_BLOCKING_THREADS)
        .build()
}

/// Drives `future` to completion, then tears the runtime down without
/// waiting for blocking tasks that are still running.
pub fn run_to_completion<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}

// ── Tests ─────────────────────────────────────────────────────────────────────
