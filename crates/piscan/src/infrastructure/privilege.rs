//! Privilege check.
//!
//! Grabbing an evdev node needs read access to `/dev/input/event*`, which on
//! a stock system means running as root.

use crate::application::session::ListenError;

/// Returns `true` if the effective user id is 0.
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Guidance printed when [`is_root`] is false.
pub const NOT_ROOT_MESSAGE: &str = "You must be root to listen for scanners!";

/// Fails with [`ListenError::NotRoot`] unless running as root.
pub fn require_root() -> Result<(), ListenError> {
    check_root(is_root())
}

fn check_root(root: bool) -> Result<(), ListenError> {
    if root {
        Ok(())
    } else {
        Err(ListenError::NotRoot)
    }
}
