#![forbid(unsafe_code)]

//! Activation code input and display.
//!
//! An activation code is stored as up to [`ACTIVATION_CODE_LEN`] decimal
//! digits and displayed in groups of [`GROUP_LEN`] joined by
//! [`GROUP_SEPARATOR`]. The display is a pure function of the stored digits
//! and [`strip_separators`] recovers them.

use crate::offset::ActivationCodeOffsets;

/// Number of digits in a complete activation code.
pub const ACTIVATION_CODE_LEN: usize = 12;
/// Digits per displayed group.
pub const GROUP_LEN: usize = 4;
/// Separator placed between displayed groups.
pub const GROUP_SEPARATOR: char = '-';

/// Group `raw` into chunks of [`GROUP_LEN`] characters joined by `-`.
///
/// Works on any input; the last chunk may be shorter.
///
/// ```
/// use msapos_input::format_activation_code;
///
/// assert_eq!(format_activation_code("767747582904"), "7677-4758-2904");
/// assert_eq!(format_activation_code("123456"), "1234-56");
/// assert_eq!(format_activation_code(""), "");
/// ```
#[must_use]
pub fn format_activation_code(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / GROUP_LEN);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Remove group separators from a displayed code.
#[must_use]
pub fn strip_separators(display: &str) -> String {
    display.chars().filter(|&c| c != GROUP_SEPARATOR).collect()
}

/// Keystroke filter for the activation code field: ASCII digits only,
/// truncated to [`ACTIVATION_CODE_LEN`].
#[must_use]
pub fn filter_activation_input(incoming: &str) -> String {
    incoming
        .chars()
        .filter(char::is_ascii_digit)
        .take(ACTIVATION_CODE_LEN)
        .collect()
}

/// Whether `code` is a full activation code (exactly 12 ASCII digits).
#[must_use]
pub fn is_complete_activation_code(code: &str) -> bool {
    code.len() == ACTIVATION_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Displayed text together with the cursor mapping that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedText {
    /// The text to show.
    pub text: String,
    /// Cursor mapping between the raw value and `text`.
    pub mapping: ActivationCodeOffsets,
}

/// Build the display form of a raw activation code.
#[must_use]
pub fn transform_activation_code(raw: &str) -> TransformedText {
    TransformedText {
        text: format_activation_code(raw),
        mapping: ActivationCodeOffsets,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::offset::OffsetMapping;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn twelve_digit_round_trip(raw in "[0-9]{12}") {
            let display = format_activation_code(&raw);
            prop_assert_eq!(display.len(), 14);
            prop_assert_eq!(strip_separators(&display), raw);
        }

        #[test]
        fn any_digit_string_round_trips(raw in "[0-9]{0,24}") {
            prop_assert_eq!(strip_separators(&format_activation_code(&raw)), raw);
        }

        #[test]
        fn cursor_lands_after_same_digit(raw in "[0-9]{12}", offset in 1usize..=12) {
            let display = format_activation_code(&raw);
            let mapped = ActivationCodeOffsets.original_to_transformed(offset);
            // The character just before the cursor is the same digit in both views.
            prop_assert_eq!(
                raw.as_bytes()[offset - 1],
                display.as_bytes()[mapped - 1]
            );
        }

        #[test]
        fn filter_output_is_valid(s in ".{0,30}") {
            let out = filter_activation_input(&s);
            prop_assert!(out.len() <= ACTIVATION_CODE_LEN);
            prop_assert!(out.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
