//! Linux input key code to key-name translation table.
//!
//! Key codes are defined in `linux/input-event-codes.h` (the `KEY_*`
//! constants).  Reference:
//! https://github.com/torvalds/linux/blob/master/include/uapi/linux/input-event-codes.h
//!
//! # Why names instead of codes? (for beginners)
//!
//! The kernel reports *which physical key* moved (`KEY_A` = 30), not which
//! character it produces.  The decoder works on key *names*: printable keys
//! are named by the character they type on a US layout (`"a"`, `"1"`, `";"`),
//! and everything else by a spelled-out, multi-character name (`"enter"`,
//! `"left shift"`, `"f5"`).  A name of exactly one character is therefore a
//! printable key; anything longer is a control key.  Keypad keys type the same
//! character as their main-row twins, so they share their names.

use crate::domain::KeyEventType;

/// Translates a Linux `KEY_*` code to the key name the decoder expects.
///
/// Returns `None` if the code has no entry in the table.
///
/// # Panics
///
/// This function never panics.
pub fn code_to_name(code: u16) -> Option<&'static str> {
    let name = match code {
        1 => "esc",
        // Digit row (KEY_1..KEY_0)
        2 => "1",
        3 => "2",
        4 => "3",
        5 => "4",
        6 => "5",
        7 => "6",
        8 => "7",
        9 => "8",
        10 => "9",
        11 => "0",
        12 => "-",
        13 => "=",
        14 => "backspace",
        15 => "tab",
        // Top letter row
        16 => "q",
        17 => "w",
        18 => "e",
        19 => "r",
        20 => "t",
        21 => "y",
        22 => "u",
        23 => "i",
        24 => "o",
        25 => "p",
        26 => "[",
        27 => "]",
        28 => "enter",
        29 => "ctrl",
        // Home row
        30 => "a",
        31 => "s",
        32 => "d",
        33 => "f",
        34 => "g",
        35 => "h",
        36 => "j",
        37 => "k",
        38 => "l",
        39 => ";",
        40 => "'",
        41 => "`",
        42 => "shift",
        43 => "\\",
        // Bottom row
        44 => "z",
        45 => "x",
        46 => "c",
        47 => "v",
        48 => "b",
        49 => "n",
        50 => "m",
        51 => ",",
        52 => ".",
        53 => "/",
        54 => "right shift",
        55 => "*", // KEY_KPASTERISK
        56 => "alt",
        57 => "space",
        58 => "caps lock",
        // Function keys F1..F10
        59 => "f1",
        60 => "f2",
        61 => "f3",
        62 => "f4",
        63 => "f5",
        64 => "f6",
        65 => "f7",
        66 => "f8",
        67 => "f9",
        68 => "f10",
        69 => "num lock",
        70 => "scroll lock",
        // Keypad
        71 => "7",
        72 => "8",
        73 => "9",
        74 => "-",
        75 => "4",
        76 => "5",
        77 => "6",
        78 => "+",
        79 => "1",
        80 => "2",
        81 => "3",
        82 => "0",
        83 => ".",
        87 => "f11",
        88 => "f12",
        96 => "enter", // KEY_KPENTER
        97 => "right ctrl",
        98 => "/", // KEY_KPSLASH
        99 => "print screen",
        100 => "alt gr",
        // Navigation cluster
        102 => "home",
        103 => "up",
        104 => "page up",
        105 => "left",
        106 => "right",
        107 => "end",
        108 => "down",
        109 => "page down",
        110 => "insert",
        111 => "delete",
        117 => "=", // KEY_KPEQUAL
        119 => "pause",
        125 => "left windows",
        126 => "right windows",
        127 => "menu",
        _ => return None,
    };
    Some(name)
}

/// Translates a Linux `KEY_*` code to a key name, falling back to a
/// descriptive multi-character name for codes missing from the table.
///
/// The fallback is never a single character, so the decoder ignores it.
pub fn key_name(code: u16) -> String {
    code_to_name(code)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("unknown {code}"))
}

/// Translates the `value` of an `EV_KEY` event to a key transition.
///
/// `0` is a release, `1` a press, and `2` an auto-repeat which is treated as
/// another press.  Any other value yields `None`.
pub fn key_event_type(value: i32) -> Option<KeyEventType> {
    match value {
        0 => Some(KeyEventType::Up),
        1 | 2 => Some(KeyEventType::Down),
        _ => None,
    }
}
