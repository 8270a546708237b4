//! Restart supervision: what happens when a scanner is lost.
//!
//! Losing a device is never handled in place.  The session stops reading and
//! asks a [`Restarter`] to replace the whole process with a fresh copy of
//! itself; see `infrastructure::restart` for the production implementation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for restart attempts.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("could not determine the current executable: {0}")]
    CurrentExe(#[source] std::io::Error),

    #[error("failed to re-execute {program}: {source}")]
    Exec {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn successor {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to restart the running process from scratch.
///
/// A successful call normally does not return, because the process image has
/// been replaced.  `Ok(())` is only observed from test doubles.
#[cfg_attr(test, mockall::automock)]
pub trait Restarter: Send + Sync {
    fn restart(&self) -> Result<(), RestartError>;
}
