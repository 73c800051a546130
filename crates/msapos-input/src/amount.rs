#![forbid(unsafe_code)]

//! Amount field sanitizing.
//!
//! The amount field is re-validated on every keystroke: the caller hands in
//! the full proposed value and gets back either that value (stripped of
//! anything that is not a digit or a decimal point) or the previous value
//! when the keystroke would break one of the field's rules.
//!
//! # Rules (checked in order)
//!
//! | Rule | Rejects |
//! |------|---------|
//! | length | more than [`MAX_AMOUNT_LEN`] grapheme clusters |
//! | separators | more than one `.` |
//! | precision | more than [`MAX_FRACTION_DIGITS`] grapheme clusters after the first `.` |
//!
//! Rejection is silent. The field simply keeps its previous value.

use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum amount length, in grapheme clusters, before filtering.
pub const MAX_AMOUNT_LEN: usize = 12;
/// Maximum number of grapheme clusters allowed after the decimal point.
pub const MAX_FRACTION_DIGITS: usize = 2;

const DECIMAL_POINT: char = '.';

/// Validate a proposed amount value against the previous one.
///
/// `incoming` is the whole field content after the keystroke, not the delta.
/// Returns `previous` unchanged when `incoming` is rejected, otherwise
/// `incoming` with every character that is neither an ASCII digit nor `.`
/// removed.
///
/// Length is measured in grapheme clusters, before filtering.
#[must_use]
pub fn sanitize_amount(previous: &str, incoming: &str) -> String {
    tracing::trace!(incoming, "amount keystroke");

    if let Some(reason) = rejection(incoming) {
        tracing::debug!(incoming, previous, reason, "rejected amount keystroke");
        return previous.to_owned();
    }

    incoming
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == DECIMAL_POINT)
        .collect()
}

fn rejection(incoming: &str) -> Option<&'static str> {
    if incoming.graphemes(true).count() > MAX_AMOUNT_LEN {
        return Some("too long");
    }
    if incoming.matches(DECIMAL_POINT).count() > 1 {
        return Some("multiple decimal points");
    }
    if let Some((_, fraction)) = incoming.split_once(DECIMAL_POINT)
        && fraction.graphemes(true).count() > MAX_FRACTION_DIGITS
    {
        return Some("too many fraction digits");
    }
    None
}

/// Parse an amount for a request, falling back to zero.
///
/// Accepted shape is `digits? ('.' digits?)?` with at least one digit
/// anywhere; everything else (empty, a lone `.`, a second `.`, signs,
/// exponents, `_` separators) yields [`Decimal::ZERO`]. Zero is not an error
/// marker: callers submit it as is.
///
/// A bare leading or trailing point is accepted, so `".5"` is `0.5` and
/// `"2."` is `2`.
#[must_use]
pub fn amount_for_submission(amount: &str) -> Decimal {
    let Some(normalized) = normalize(amount) else {
        tracing::debug!(amount, "amount malformed, submitting zero");
        return Decimal::ZERO;
    };
    match Decimal::from_str(&normalized) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(amount, error = %err, "amount not parseable, submitting zero");
            Decimal::ZERO
        }
    }
}

/// Canonical `int[.frac]` form, or `None` when `amount` is not a plain
/// decimal.
fn normalize(amount: &str) -> Option<String> {
    let (int, frac) = amount.split_once(DECIMAL_POINT).unwrap_or((amount, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !digits(frac) || int.len() + frac.len() == 0 {
        return None;
    }
    let int = if int.is_empty() { "0" } else { int };
    Some(if frac.is_empty() {
        int.to_owned()
    } else {
        format!("{int}.{frac}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn accepts_plain_digits() {
        assert_eq!(sanitize_amount("", "1"), "1");
        assert_eq!(sanitize_amount("1", "12"), "12");
    }

    #[test]
    fn accepts_two_fraction_digits() {
        assert_eq!(sanitize_amount("12.3", "12.34"), "12.34");
    }

    #[test]
    fn rejects_three_fraction_digits() {
        assert_eq!(sanitize_amount("", "12.345"), "");
        assert_eq!(sanitize_amount("12.34", "12.345"), "12.34");
    }

    #[test]
    fn rejects_second_decimal_point() {
        assert_eq!(sanitize_amount("1.2", "1.2.3"), "1.2");
        assert_eq!(sanitize_amount("1.", "1.."), "1.");
    }

    #[test]
    fn strips_non_digit_characters() {
        assert_eq!(sanitize_amount("", "12.5a"), "12.5");
        assert_eq!(sanitize_amount("", "1,000"), "1000");
        assert_eq!(sanitize_amount("", " 7 "), "7");
    }

    #[test]
    fn strips_minus_sign() {
        assert_eq!(sanitize_amount("", "-5"), "5");
    }

    #[test]
    fn length_boundary() {
        let twelve = "123456789012";
        assert_eq!(sanitize_amount("", twelve), twelve);
        assert_eq!(sanitize_amount(twelve, "1234567890123"), twelve);
    }

    #[test]
    fn length_checked_before_filtering() {
        // 12 characters including the letter: accepted, then filtered.
        assert_eq!(sanitize_amount("", "12345678901a"), "12345678901");
        // 13 characters: rejected even though filtering would shorten it.
        assert_eq!(sanitize_amount("9", "12345678901ab"), "9");
    }

    #[test]
    fn length_counts_grapheme_clusters() {
        // Twelve clusters, twenty-three chars: within the limit.
        let twelve = format!("1{}", "e\u{301}".repeat(11));
        assert_eq!(sanitize_amount("", &twelve), "1");
        let thirteen = format!("1{}", "e\u{301}".repeat(12));
        assert_eq!(sanitize_amount("7", &thirteen), "7");
    }

    #[test]
    fn fraction_counts_unfiltered_characters() {
        assert_eq!(sanitize_amount("1.2", "1.2x3"), "1.2");
        assert_eq!(sanitize_amount("1.2", "1.2x"), "1.2");
    }

    #[test]
    fn lone_point_is_accepted() {
        assert_eq!(sanitize_amount("", "."), ".");
    }

    #[test]
    fn empty_incoming_clears_field() {
        assert_eq!(sanitize_amount("2", ""), "");
    }

    #[test]
    fn non_ascii_digits_are_stripped() {
        assert_eq!(sanitize_amount("", "1٢3"), "13");
    }

    #[test]
    fn submission_empty_is_zero() {
        assert_eq!(amount_for_submission(""), Decimal::ZERO);
    }

    #[test]
    fn submission_parses_decimal() {
        assert_eq!(amount_for_submission("3.14"), Decimal::new(314, 2));
        assert_eq!(amount_for_submission("2"), Decimal::new(2, 0));
    }

    #[test]
    fn submission_malformed_is_zero() {
        assert_eq!(amount_for_submission("abc"), Decimal::ZERO);
        assert_eq!(amount_for_submission("1.2.3"), Decimal::ZERO);
        assert_eq!(amount_for_submission("."), Decimal::ZERO);
    }

    #[test]
    fn submission_rejects_stray_points_and_separators() {
        for malformed in ["1.2.", ".5.", "1..", "1_000", "1e3", "-5", "+5", " 5"] {
            assert_eq!(
                amount_for_submission(malformed),
                Decimal::ZERO,
                "{malformed:?} should submit as zero"
            );
        }
    }

    #[test]
    fn submission_accepts_bare_point_forms() {
        assert_eq!(amount_for_submission(".5"), Decimal::new(5, 1));
        assert_eq!(amount_for_submission("2."), Decimal::new(2, 0));
    }

    #[test]
    #[traced_test]
    fn rejection_is_logged() {
        let _ = sanitize_amount("1.2", "1.2.3");
        assert!(logs_contain("rejected amount keystroke"));
        assert!(logs_contain("multiple decimal points"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn too_long_input_keeps_previous(prev in "[0-9]{0,6}", s in ".{13,40}") {
            prop_assume!(s.graphemes(true).count() > MAX_AMOUNT_LEN);
            prop_assert_eq!(sanitize_amount(&prev, &s), prev);
        }

        #[test]
        fn output_is_previous_or_clean(prev in "[0-9]{0,4}", s in "[0-9.a-z ]{0,14}") {
            let out = sanitize_amount(&prev, &s);
            if out != prev {
                prop_assert!(out.chars().all(|c| c.is_ascii_digit() || c == '.'));
                prop_assert!(out.matches('.').count() <= 1);
                prop_assert!(out.len() <= MAX_AMOUNT_LEN);
                if let Some((_, frac)) = out.split_once('.') {
                    prop_assert!(frac.len() <= MAX_FRACTION_DIGITS);
                }
            }
        }

        #[test]
        fn clean_amounts_submit_their_value(int in 0u64..1_000_000, frac in 0u32..100) {
            let text = format!("{int}.{frac:02}");
            let expected = Decimal::new((int as i64) * 100 + i64::from(frac), 2);
            prop_assert_eq!(amount_for_submission(&text), expected);
        }
    }
}
