#![forbid(unsafe_code)]

//! Cursor offset mapping between a raw value and its displayed form.
//!
//! A formatted field shows something different from what it stores (the
//! activation code is stored as 12 digits but shown as `XXXX-XXXX-XXXX`).
//! The cursor lives in raw coordinates; an [`OffsetMapping`] converts it to
//! display coordinates for rendering and back when the user places the
//! cursor on the displayed text.

/// Bidirectional cursor mapping between raw and displayed text.
///
/// Implementations must be total: every offset maps to some offset.
pub trait OffsetMapping {
    /// Map a cursor offset in the raw value to the displayed text.
    fn original_to_transformed(&self, offset: usize) -> usize;

    /// Map a cursor offset in the displayed text back to the raw value.
    fn transformed_to_original(&self, offset: usize) -> usize;
}

/// Mapping for fields displayed verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityOffsets;

impl OffsetMapping for IdentityOffsets {
    fn original_to_transformed(&self, offset: usize) -> usize {
        offset
    }

    fn transformed_to_original(&self, offset: usize) -> usize {
        offset
    }
}

/// Fixed mapping for a 12-digit activation code shown as `XXXX-XXXX-XXXX`.
///
/// ```text
/// raw      1234 5678 9012
/// display  1234-5678-9012
///          ^    ^    ^
///          1-4  6-9  11-14   (display offsets after each digit)
/// ```
///
/// | raw offset | display | display offset | raw |
/// |------------|---------|----------------|-----|
/// | 1-4        | same    | 1-4            | same |
/// | 5-8        | +1      | 5-9            | -1  |
/// | 9-12       | +2      | 11-14          | -2  |
/// |            |         | 15-19          | -3  |
/// | otherwise  | same    | otherwise      | same |
///
/// The table is tied to the three-group layout and is not a general chunking
/// rule. Two gaps are kept as is: display offset 10 (just after the second
/// dash) maps to raw 10 instead of 8, and raw offsets from 13 up are not
/// shifted even though display offsets 15-19 are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationCodeOffsets;

impl OffsetMapping for ActivationCodeOffsets {
    fn original_to_transformed(&self, offset: usize) -> usize {
        match offset {
            1..=4 => offset,
            5..=8 => offset + 1,
            9..=12 => offset + 2,
            _ => offset,
        }
    }

    fn transformed_to_original(&self, offset: usize) -> usize {
        match offset {
            1..=4 => offset,
            5..=9 => offset - 1,
            11..=14 => offset - 2,
            15..=19 => offset - 3,
            _ => offset,
        }
    }
}
