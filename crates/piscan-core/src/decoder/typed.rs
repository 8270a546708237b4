//! The decode pass: turns one buffered run of key events into text.
//!
//! # How a scanner "types" (for beginners)
//!
//! A USB barcode scanner presents itself as a keyboard.  Scanning `Ab:1`
//! produces roughly this event stream:
//!
//! ```text
//! shift↓  a↓ a↑  shift↑  b↓ b↑  shift↓ ;↓ ;↑ shift↑  1↓ 1↑  enter↓ enter↑
//! ```
//!
//! The decode pass replays that stream with a tiny amount of state (is shift
//! held? is caps lock on?) and appends one character per key-down.  Modifier
//! state starts fresh for every pass, so a caps lock toggled during one scan
//! does not leak into the next.

use crate::domain::RawKeyEvent;

use super::shift::shift;

/// Name of the key that deletes the previous character on this platform.
#[cfg(target_os = "macos")]
pub const BACKSPACE_KEY_NAME: &str = "delete";

/// Name of the key that deletes the previous character on this platform.
#[cfg(not(target_os = "macos"))]
pub const BACKSPACE_KEY_NAME: &str = "backspace";

/// Name of the caps lock key.
pub const CAPS_LOCK_KEY_NAME: &str = "caps lock";

/// Name of the space bar; it is the only printable key with a spelled-out name.
pub const SPACE_KEY_NAME: &str = "space";

/// Decodes `events` (in order) into the string they typed.
///
/// - A key whose name contains `"shift"` sets the shift state to whether it
///   is down.
/// - `"caps lock"` down toggles caps lock.
/// - Backspace down removes the last character, if `allow_backspace`.
/// - Any other key-down with a one-character name (or `"space"`) appends that
///   character, shifted when exactly one of shift and caps lock is active.
/// - Multi-character names (`"f1"`, `"enter"`, `"left ctrl"`) and key-ups
///   contribute nothing.
pub fn decode_typed_string(events: &[RawKeyEvent], allow_backspace: bool) -> String {
    let mut shift_pressed = false;
    let mut capslock_pressed = false;
    let mut result = String::new();

    for event in events {
        let name = event.key_name.as_str();

        if name.contains("shift") {
            shift_pressed = event.is_down();
        } else if name == CAPS_LOCK_KEY_NAME && event.is_down() {
            capslock_pressed = !capslock_pressed;
        } else if allow_backspace && name == BACKSPACE_KEY_NAME && event.is_down() {
            result.pop();
        } else if event.is_down() {
            let typed = if name == SPACE_KEY_NAME { " " } else { name };
            if let Some(c) = single_char(typed) {
                if shift_pressed ^ capslock_pressed {
                    result.push(shift(c));
                } else {
                    result.push(c);
                }
            }
        }
    }

    result
}

/// Returns the only character of `name`, or `None` if it has zero or several.
fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
