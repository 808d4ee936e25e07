//! Draft content and its local validation.
//!
//! Drafts are validated before any network traffic: an invalid draft
//! fails fast on the caller's side and the backends never see it.

use crate::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// A question waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Title of the question.
    pub title: String,
    /// Question text.
    pub body: String,
    /// Tags to file the question under.
    pub tags: Vec<String>,
}

impl NewQuestion {
    /// Creates a question draft.
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags,
        }
    }

    /// Checks that the draft is submittable: title, body, and at least
    /// one non-blank tag are all required.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty("title"));
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::empty("body"));
        }
        if self.tags.is_empty() {
            return Err(ValidationError::new("tags", "at least one tag is required"));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::new("tags", "tags must not be blank"));
        }
        Ok(())
    }
}

/// An answer waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnswer {
    /// Answer text.
    pub body: String,
}

impl NewAnswer {
    /// Creates an answer draft.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Checks that the answer has text.
    pub fn validate(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            return Err(ValidationError::empty("body"));
        }
        Ok(())
    }
}
