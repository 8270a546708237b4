//! Callback dispatch: hand each completed scan to user code without waiting.
//!
//! # Why not just call the callback? (for beginners)
//!
//! The session loop is the only consumer of the merged device queue.  If it
//! called the handler directly, a handler that writes to a database or posts
//! to a web service would stall every scanner until it returned.  Instead,
//! every scan is run on tokio's blocking thread pool and the loop moves on
//! immediately.
//!
//! Each dispatch has its own failure boundary: a handler that returns an
//! error or panics is logged with the scan text and affects nothing else.
//!
//! ```text
//!  session loop ── dispatch(scan) ──► spawn_blocking(handler.handle_scan)
//!       │                                     │
//!       ▼ (continues reading)                 ▼
//!                                   watcher task logs the outcome
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// User code that consumes completed scans.
///
/// Implemented for every `Fn(&str) -> anyhow::Result<()>` closure, so most
/// callers never name this trait.
pub trait ScanHandler: Send + Sync + 'static {
    fn handle_scan(&self, scan: &str) -> anyhow::Result<()>;
}

impl<F> ScanHandler for F
where
    F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn handle_scan(&self, scan: &str) -> anyhow::Result<()> {
        self(scan)
    }
}

/// How one dispatched callback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    /// The handler returned an error.
    Failed,
    Panicked,
    /// The runtime shut down before the handler finished.
    Cancelled,
}

/// Fires a [`ScanHandler`] once per scan on an independent task.
#[derive(Clone)]
pub struct CallbackDispatcher {
    handler: Arc<dyn ScanHandler>,
}

impl CallbackDispatcher {
    pub fn new(handler: Arc<dyn ScanHandler>) -> Self {
        Self { handler }
    }

    /// Starts the handler for `scan` and returns immediately.
    ///
    /// Handlers are submitted in call order; how long each takes, and so the
    /// order they finish in, is up to the handler.  The returned handle
    /// resolves once the outcome has been logged.  Dropping it does not
    /// cancel anything.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, scan: String) -> JoinHandle<DispatchOutcome> {
        let handler = Arc::clone(&self.handler);
        let job = {
            let scan = scan.clone();
            tokio::task::spawn_blocking(move || handler.handle_scan(&scan))
        };

        tokio::spawn(async move {
            match job.await {
                Ok(Ok(())) => {
                    debug!(scan = %scan, "scan handled");
                    DispatchOutcome::Completed
                }
                Ok(Err(e)) => {
                    error!(scan = %scan, "scan handler failed: {e:#}");
                    DispatchOutcome::Failed
                }
                Err(e) if e.is_panic() => {
                    error!(scan = %scan, "scan handler panicked");
                    DispatchOutcome::Panicked
                }
                Err(_) => {
                    warn!(scan = %scan, "scan handler cancelled");
                    DispatchOutcome::Cancelled
                }
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
