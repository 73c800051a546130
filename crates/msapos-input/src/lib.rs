#![forbid(unsafe_code)]

//! Input formatting for the MSA POS demo.
//!
//! This crate holds the keystroke-level logic behind the demo's text fields:
//! - [`sanitize_amount`] - per-keystroke amount validation
//! - [`amount_for_submission`] - lenient decimal parse used when a request is built
//! - [`format_activation_code`] - `XXXX-XXXX-XXXX` grouping for display
//! - [`ActivationCodeOffsets`] - cursor mapping between raw and grouped code
//! - [`InputField`] - an editable value + cursor driven by a [`FieldFormat`]
//!
//! # Example
//! ```
//! use msapos_input::{ActivationCodeOffsets, OffsetMapping, format_activation_code, sanitize_amount};
//!
//! assert_eq!(sanitize_amount("1.2", "1.23"), "1.23");
//! assert_eq!(sanitize_amount("1.23", "1.234"), "1.23");
//!
//! assert_eq!(format_activation_code("767747582904"), "7677-4758-2904");
//! assert_eq!(ActivationCodeOffsets.original_to_transformed(5), 6);
//! ```

pub mod activation;
pub mod amount;
pub mod field;
pub mod offset;

pub use activation::{
    ACTIVATION_CODE_LEN, GROUP_LEN, GROUP_SEPARATOR, TransformedText, filter_activation_input,
    format_activation_code, is_complete_activation_code, strip_separators,
    transform_activation_code,
};
pub use amount::{MAX_AMOUNT_LEN, MAX_FRACTION_DIGITS, amount_for_submission, sanitize_amount};
pub use field::{ActivationCodeFormat, AmountFormat, FieldFormat, InputField};
pub use offset::{ActivationCodeOffsets, IdentityOffsets, OffsetMapping};
