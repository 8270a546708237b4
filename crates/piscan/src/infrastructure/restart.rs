//! Process re-execution: the recovery path for an unplugged scanner.
//!
//! # Why restart the whole process? (for beginners)
//!
//! When a grabbed scanner disappears its evdev node is gone for good; if it
//! is plugged back in, the kernel creates a *new* node, possibly with a
//! different number.  Rather than track hot-plug events, PiScan replaces
//! itself with a fresh copy of the same program.  The new copy rediscovers
//! the scanners, grabs them again, and resumes listening.
//!
//! The invocation (executable, argv, environment) is captured once at
//! start-up into a [`ProcessImage`] and replayed verbatim:
//!
//! - **Unix**: `execve` via [`std::os::unix::process::CommandExt::exec`].
//!   The PID is kept, argv\[0\] is preserved, and the call only returns on
//!   failure.
//! - **Elsewhere**: a successor process is spawned with the same argv and
//!   environment, then the current process exits.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use crate::application::supervisor::{RestartError, Restarter};

/// The exact invocation that started this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessImage {
    /// Path of the running executable.
    pub program: PathBuf,
    /// Full argv, including argv\[0\].
    pub args: Vec<OsString>,
    /// Every environment variable, in the order the OS reported them.
    pub env: Vec<(OsString, OsString)>,
}

impl ProcessImage {
    /// Snapshots the current process's executable, arguments and environment.
    ///
    /// Call this before anything mutates the environment.
    ///
    /// # Errors
    ///
    /// Returns [`RestartError::CurrentExe`] if the executable path cannot be
    /// determined.
    pub fn capture() -> Result<Self, RestartError> {
        Ok(Self {
            program: std::env::current_exe().map_err(RestartError::CurrentExe)?,
            args: std::env::args_os().collect(),
            env: std::env::vars_os().collect(),
        })
    }

    /// Builds a [`Command`] that replays this image exactly.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);

        #[cfg(unix)]
        if let Some(argv0) = self.args.first() {
            use std::os::unix::process::CommandExt;
            cmd.arg0(argv0);
        }

        cmd.args(self.args.iter().skip(1))
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

/// Production [`Restarter`]: replaces the process with its captured image.
#[derive(Debug, Clone)]
pub struct ExecRestarter {
    image: ProcessImage,
}

impl ExecRestarter {
    pub fn new(image: ProcessImage) -> Self {
        Self { image }
    }

    /// Captures the current invocation.  See [`ProcessImage::capture`].
    pub fn capture() -> Result<Self, RestartError> {
        ProcessImage::capture().map(Self::new)
    }

    pub fn image(&self) -> &ProcessImage {
        &self.image
    }
}

impl Restarter for ExecRestarter {
    #[cfg(unix)]
    fn restart(&self) -> Result<(), RestartError> {
        use std::os::unix::process::CommandExt;

        info!(program = %self.image.program.display(), "re-executing");
        // exec only returns on failure.
        let source = self.image.command().exec();
        Err(RestartError::Exec {
            program: self.image.program.clone(),
            source,
        })
    }

    #[cfg(not(unix))]
    fn restart(&self) -> Result<(), RestartError> {
        info!(program = %self.image.program.display(), "spawning successor process");
        self.image
            .command()
            .spawn()
            .map_err(|source| RestartError::Spawn {
                program: self.image.program.clone(),
                source,
            })?;
        std::process::exit(0)
    }
}
