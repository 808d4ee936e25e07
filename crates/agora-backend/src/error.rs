//! The shared backend error taxonomy.
//!
//! Both adapters fold their transport-specific failures into these five
//! shapes so callers never branch on HTTP status codes or revert strings.

use agora_types::ValidationError;
use thiserror::Error;

/// Errors produced by any board backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The draft failed local validation and was never submitted.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend could not be reached or did not respond usably.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend understood the request and refused it.
    #[error("write rejected: {0}")]
    Rejected(String),

    /// A vote was refused because one was already recorded.
    #[error("already voted on {target}")]
    AlreadyVoted {
        /// Display form of the vote target.
        target: String,
    },

    /// The requested entity does not exist on this backend.
    #[error("not found: {kind} '{id}'")]
    NotFound {
        /// The kind of entity that was missing.
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
}

impl BackendError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Creates an already-voted error.
    pub fn already_voted(target: impl ToString) -> Self {
        Self::AlreadyVoted {
            target: target.to_string(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True when the failure was in transport rather than a refusal.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
