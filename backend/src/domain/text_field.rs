//! Blank and length rules for free-text columns.
//!
//! Bounds mirror the `VARCHAR` limits in the migrations so oversized input is
//! rejected as a client error before it reaches the store. Lengths count
//! characters, as PostgreSQL does.

use serde_json::json;

use super::Error;

/// Bound of `full_name`, `specialty`, `approach`, and `languages`.
pub const MAX_TEXT_LEN: usize = 255;
/// Bound of `phone` and `gender`.
pub const MAX_SHORT_TEXT_LEN: usize = 32;
/// Bound of `license_number`.
pub const MAX_LICENSE_LEN: usize = 64;

/// A free-text field outside its stored bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextFieldError {
    /// Required text was empty once trimmed.
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    /// Text exceeds its column width.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl TextFieldError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => field,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Blank { .. } => "blank",
            Self::TooLong { .. } => "too_long",
        }
    }
}

impl From<TextFieldError> for Error {
    fn from(err: TextFieldError) -> Self {
        Self::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

/// Reject text longer than `max` characters.
pub(crate) fn ensure_fits(value: &str, field: &'static str, max: usize) -> Result<(), TextFieldError> {
    if value.chars().count() > max {
        Err(TextFieldError::TooLong { field, max })
    } else {
        Ok(())
    }
}

/// Reject blank text or text longer than `max` characters.
pub(crate) fn ensure_filled(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), TextFieldError> {
    if value.trim().is_empty() {
        return Err(TextFieldError::Blank { field });
    }
    ensure_fits(value, field, max)
}
