//! Validation errors for draft content.

use thiserror::Error;

/// A draft failed local validation and was never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: &'static str,
    /// Why the field was rejected.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for the given field.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// A required field was empty or missing.
    pub fn empty(field: &'static str) -> Self {
        Self::new(field, "must not be empty")
    }
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
