#![forbid(unsafe_code)]

//! Editable single-line field state.
//!
//! [`InputField`] owns a raw value and a cursor (grapheme index into the raw
//! value). Every edit is turned into a full proposed value and run through
//! the field's [`FieldFormat`], which either accepts it (possibly cleaned up)
//! or keeps the previous value. A rejected edit moves neither value nor
//! cursor.
//!
//! Rendering goes through [`InputField::display`] and
//! [`InputField::display_cursor`], which apply the format's display
//! transformation and offset mapping.

use unicode_segmentation::UnicodeSegmentation;

use crate::activation::{filter_activation_input, format_activation_code};
use crate::amount::sanitize_amount;
use crate::offset::{ActivationCodeOffsets, IdentityOffsets, OffsetMapping};

/// Acceptance and display rules for an [`InputField`].
pub trait FieldFormat {
    /// Cursor mapping between raw and displayed text.
    type Offsets: OffsetMapping;

    /// Decide the new raw value given the current one and a proposed one.
    ///
    /// Returning `previous` rejects the edit.
    fn accept(&self, previous: &str, incoming: &str) -> String;

    /// Displayed form of a raw value.
    fn display(&self, raw: &str) -> String;

    /// Offset mapping matching [`FieldFormat::display`].
    fn offsets(&self) -> Self::Offsets;
}

/// Amount entry: per-keystroke [`sanitize_amount`], shown verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountFormat;

impl FieldFormat for AmountFormat {
    type Offsets = IdentityOffsets;

    fn accept(&self, previous: &str, incoming: &str) -> String {
        sanitize_amount(previous, incoming)
    }

    fn display(&self, raw: &str) -> String {
        raw.to_owned()
    }

    fn offsets(&self) -> IdentityOffsets {
        IdentityOffsets
    }
}

/// Activation code entry: digits only, at most 12, shown as `XXXX-XXXX-XXXX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationCodeFormat;

impl FieldFormat for ActivationCodeFormat {
    type Offsets = ActivationCodeOffsets;

    fn accept(&self, _previous: &str, incoming: &str) -> String {
        filter_activation_input(incoming)
    }

    fn display(&self, raw: &str) -> String {
        format_activation_code(raw)
    }

    fn offsets(&self) -> ActivationCodeOffsets {
        ActivationCodeOffsets
    }
}

/// A single-line editable value with a cursor.
#[derive(Debug, Clone, Default)]
pub struct InputField<F> {
    /// Raw value.
    value: String,
    /// Cursor position (grapheme index into `value`).
    cursor: usize,
    format: F,
}

impl<F: FieldFormat> InputField<F> {
    /// Create an empty field.
    pub fn new(format: F) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            format,
        }
    }

    /// Set the raw value without validation, cursor at the end (builder).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.replace(value);
        self
    }

    // --- Value access ---

    /// Current raw value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in the raw value (grapheme index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Overwrite the raw value without validation and put the cursor at the end.
    ///
    /// Used for programmatic resets (restoring defaults), not for user edits.
    pub fn replace(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.grapheme_count();
    }

    /// Propose a whole new value, as a text widget does on every change.
    ///
    /// Returns `true` if the value changed.
    pub fn set_value(&mut self, incoming: &str) -> bool {
        let accepted = self.format.accept(&self.value, incoming);
        if accepted == self.value {
            return false;
        }
        self.value = accepted;
        self.cursor = self.cursor.min(self.grapheme_count());
        true
    }

    // --- Editing operations ---

    /// Insert a character at the cursor. Returns `true` if accepted.
    pub fn insert_char(&mut self, c: char) -> bool {
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        let mut incoming = self.value.clone();
        incoming.insert(byte_offset, c);

        if !self.commit(&incoming) {
            return false;
        }
        self.cursor = (self.cursor + 1).min(self.grapheme_count());
        true
    }

    /// Delete the grapheme before the cursor. Returns `true` if accepted.
    pub fn delete_char_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor - 1);
        let byte_end = self.grapheme_byte_offset(self.cursor);
        let mut incoming = self.value.clone();
        incoming.drain(byte_start..byte_end);

        if !self.commit(&incoming) {
            return false;
        }
        self.cursor = (self.cursor - 1).min(self.grapheme_count());
        true
    }

    /// Delete the grapheme at the cursor. Returns `true` if accepted.
    pub fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor);
        let byte_end = self.grapheme_byte_offset(self.cursor + 1);
        let mut incoming = self.value.clone();
        incoming.drain(byte_start..byte_end);

        if !self.commit(&incoming) {
            return false;
        }
        self.cursor = self.cursor.min(self.grapheme_count());
        true
    }

    /// Clear the value.
    pub fn clear(&mut self) -> bool {
        self.set_value("")
    }

    // --- Cursor movement ---

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.grapheme_count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    // --- Display ---

    /// Displayed form of the value.
    pub fn display(&self) -> String {
        self.format.display(&self.value)
    }

    /// Cursor position in the displayed text.
    pub fn display_cursor(&self) -> usize {
        self.format.offsets().original_to_transformed(self.cursor)
    }

    /// Place the cursor from a position in the displayed text (a click).
    pub fn set_cursor_from_display(&mut self, offset: usize) {
        let raw = self.format.offsets().transformed_to_original(offset);
        self.cursor = raw.min(self.grapheme_count());
    }

    // --- Internal helpers ---

    fn commit(&mut self, incoming: &str) -> bool {
        let accepted = self.format.accept(&self.value, incoming);
        if accepted == self.value {
            return false;
        }
        self.value = accepted;
        true
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: &str) -> InputField<AmountFormat> {
        InputField::new(AmountFormat).with_value(value)
    }

    fn code(value: &str) -> InputField<ActivationCodeFormat> {
        InputField::new(ActivationCodeFormat).with_value(value)
    }

    #[test]
    fn empty_field() {
        let field = InputField::new(AmountFormat);
        assert!(field.value().is_empty());
        assert_eq!(field.cursor(), 0);
        assert_eq!(field.display_cursor(), 0);
    }

    #[test]
    fn with_value_puts_cursor_at_end() {
        let field = amount("12.5");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn typing_an_amount() {
        let mut field = InputField::new(AmountFormat);
        for c in "12.34".chars() {
            assert!(field.insert_char(c));
        }
        assert_eq!(field.value(), "12.34");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn third_fraction_digit_is_rejected() {
        let mut field = amount("12.34");
        assert!(!field.insert_char('5'));
        assert_eq!(field.value(), "12.34");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn letter_is_dropped_without_moving_cursor() {
        let mut field = amount("12");
        assert!(!field.insert_char('x'));
        assert_eq!(field.value(), "12");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn insert_mid_value() {
        let mut field = amount("13");
        field.move_cursor_left();
        assert!(field.insert_char('2'));
        assert_eq!(field.value(), "123");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut field = amount("1.25");
        assert!(field.delete_char_back());
        assert_eq!(field.value(), "1.2");
        field.move_cursor_home();
        assert!(field.delete_char_forward());
        assert_eq!(field.value(), ".2");
        assert_eq!(field.cursor(), 0);
        assert!(!field.delete_char_back());
    }

    #[test]
    fn set_value_runs_acceptance() {
        let mut field = amount("1.2");
        assert!(!field.set_value("1.2.3"));
        assert_eq!(field.value(), "1.2");
        assert!(field.set_value("12.5a"));
        assert_eq!(field.value(), "12.5");
    }

    #[test]
    fn set_value_clamps_cursor() {
        let mut field = amount("123456");
        assert!(field.set_value("12"));
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn clear_empties_field() {
        let mut field = amount("42");
        assert!(field.clear());
        assert_eq!(field.value(), "");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn activation_code_display_and_cursor() {
        let field = code("767747582904");
        assert_eq!(field.display(), "7677-4758-2904");
        assert_eq!(field.cursor(), 12);
        assert_eq!(field.display_cursor(), 14);
    }

    #[test]
    fn activation_code_cursor_skips_dash() {
        let mut field = code("12345");
        assert_eq!(field.display(), "1234-5");
        assert_eq!(field.display_cursor(), 6);
        field.move_cursor_left();
        assert_eq!(field.cursor(), 4);
        assert_eq!(field.display_cursor(), 4);
    }

    #[test]
    fn activation_code_rejects_thirteenth_digit() {
        let mut field = code("767747582904");
        assert!(!field.insert_char('1'));
        assert_eq!(field.value(), "767747582904");
    }

    #[test]
    fn activation_code_insert_when_full_shifts_tail_out() {
        let mut field = code("123456789012");
        field.move_cursor_home();
        assert!(field.insert_char('9'));
        assert_eq!(field.value(), "912345678901");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn activation_code_drops_letters() {
        let mut field = code("1234");
        assert!(!field.insert_char('a'));
        assert!(field.set_value("1234-5678"));
        assert_eq!(field.value(), "12345678");
    }

    #[test]
    fn click_on_display_places_raw_cursor() {
        let mut field = code("767747582904");
        field.set_cursor_from_display(5);
        assert_eq!(field.cursor(), 4);
        field.set_cursor_from_display(11);
        assert_eq!(field.cursor(), 9);
        field.set_cursor_from_display(19);
        assert_eq!(field.cursor(), 12);
    }

    #[test]
    fn click_past_end_is_clamped() {
        let mut field = code("1234");
        field.set_cursor_from_display(9);
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn cursor_movement_bounds() {
        let mut field = amount("12");
        field.move_cursor_right();
        assert_eq!(field.cursor(), 2);
        field.move_cursor_home();
        field.move_cursor_left();
        assert_eq!(field.cursor(), 0);
        field.move_cursor_end();
        assert_eq!(field.cursor(), 2);
    }
}
