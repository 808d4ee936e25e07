//! User identity and profile types.

use crate::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Who authored a question, answer, or vote.
///
/// The label is whatever the backend displays for the user: the account
/// name on the REST service, the wallet address on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    /// Backend identity of the author.
    pub id: UserId,
    /// Display label for the author.
    pub label: String,
}

impl AuthorRef {
    /// Creates an author reference.
    pub fn new(id: impl Into<UserId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The signed-in user's account record on the REST service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email, when known.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form bio.
    #[serde(default)]
    pub about: Option<String>,
    /// Tags the user follows.
    #[serde(default)]
    pub tags_watched: Vec<String>,
    /// When the account was created.
    #[serde(default)]
    pub joined_at: Option<Timestamp>,
}

impl UserProfile {
    /// The author reference this profile writes under.
    #[must_use]
    pub fn author(&self) -> AuthorRef {
        AuthorRef::new(self.id.clone(), self.name.clone())
    }
}
