//! Answers to questions.

use crate::{AnswerId, AuthorRef, QuestionId, Timestamp, VoteTally};
use serde::{Deserialize, Serialize};

/// An answer, always embedded in its owning question aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Unique identifier of the answer.
    pub id: AnswerId,
    /// The question this answer belongs to.
    pub question_id: QuestionId,
    /// Answer text.
    pub body: String,
    /// Who wrote the answer.
    pub author: AuthorRef,
    /// When the answer was posted.
    pub answered_at: Timestamp,
    /// Vote state, where the backend tracks votes on answers.
    #[serde(default)]
    pub votes: VoteTally,
}

impl Answer {
    /// Creates an answer with no votes.
    pub fn new(
        id: impl Into<AnswerId>,
        question_id: impl Into<QuestionId>,
        body: impl Into<String>,
        author: AuthorRef,
        answered_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            question_id: question_id.into(),
            body: body.into(),
            author,
            answered_at,
            votes: VoteTally::default(),
        }
    }

    /// Net vote score of this answer.
    #[must_use]
    pub fn net_score(&self) -> i64 {
        self.votes.net()
    }
}
