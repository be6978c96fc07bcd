//! Boundary error types.
//!
//! Grading itself never fails: incomplete submissions grade to zero.
//! These errors cover the form boundary instead (lookup, create/update
//! validation, payload decoding) and map onto the HTTP-equivalent
//! statuses a serving layer would surface.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced to callers at the form boundary.
#[derive(Debug, Error)]
pub enum FormError {
    /// The requested form id does not exist.
    #[error("form not found: {0}")]
    NotFound(Uuid),

    /// A form payload failed validation on create or update. The request
    /// is rejected with per-field messages; nothing is written.
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A field held a value of the wrong type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The payload was not valid JSON at all.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The backing store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A single failed validation check, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl FormError {
    /// HTTP-equivalent status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            FormError::NotFound(_) => 404,
            FormError::Validation(_) | FormError::TypeMismatch(_) | FormError::Malformed(_) => 400,
            FormError::Storage(_) => 500,
        }
    }

    /// Returns `true` for the only externally meaningful grading failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FormError::NotFound(_))
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
