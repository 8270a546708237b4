//! US-layout shift mapping for single-character key names.
//!
//! Scanners emulate a US keyboard: to send `:` they press shift and `;`.
//! Letters are upper-cased; the punctuation and digit row use the table
//! below; everything else passes through unchanged.

/// Unshifted → shifted character pairs for the US layout.
pub const SHIFTED_SYMBOLS: [(char, char); 21] = [
    ('`', '~'),
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('0', ')'),
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    (';', ':'),
    ('\'', '"'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

/// Returns the character a US keyboard produces for `c` with shift held.
///
/// # Panics
///
/// This function never panics.
pub fn shift(c: char) -> char {
    if c.is_ascii_alphabetic() {
        return c.to_ascii_uppercase();
    }
    SHIFTED_SYMBOLS
        .iter()
        .find(|(plain, _)| *plain == c)
        .map(|&(_, shifted)| shifted)
        .unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_letters_become_uppercase() {
        for c in 'a'..='z' {
            assert_eq!(shift(c), c.to_ascii_uppercase());
        }
    }

    #[test]
    fn test_uppercase_letters_stay_uppercase() {
        assert_eq!(shift('Q'), 'Q');
    }

    #[test]
    fn test_digit_row_maps_to_symbols() {
        let shifted: String = "1234567890".chars().map(shift).collect();
        assert_eq!(shifted, "!@#$%^&*()");
    }

    #[test]
    fn test_punctuation_maps_per_table() {
        let shifted: String = "`-=[]\\;',./".chars().map(shift).collect();
        assert_eq!(shifted, "~_+{}|:\"<>?");
    }

    #[test]
    fn test_characters_outside_table_are_unchanged() {
        assert_eq!(shift(' '), ' ');
        assert_eq!(shift('~'), '~');
        assert_eq!(shift('é'), 'é');
    }

    #[test]
    fn test_table_has_no_duplicate_sources() {
        let mut sources: Vec<char> = SHIFTED_SYMBOLS.iter().map(|(plain, _)| *plain).collect();
        sources.sort_unstable();
        sources.dedup();
        assert_eq!(sources.len(), SHIFTED_SYMBOLS.len());
    }
}
