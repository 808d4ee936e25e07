//! Questions: the aggregate root of the board.

use crate::{Answer, AuthorRef, QuestionId, Timestamp, VoteTally};
use serde::{Deserialize, Serialize};

/// A question with its embedded answers.
///
/// Questions are only ever created through a backend write and only ever
/// change by being replaced wholesale during a refresh; nothing mutates
/// a stored question in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier of the question.
    pub id: QuestionId,
    /// Question title.
    pub title: String,
    /// Question text.
    pub body: String,
    /// Tags the question was filed under. At least one.
    pub tags: Vec<String>,
    /// Who asked the question.
    pub author: AuthorRef,
    /// When the question was asked.
    pub asked_at: Timestamp,
    /// Denormalized answer count as reported by the backend.
    ///
    /// The store recomputes this from `answers` on ingest rather than
    /// trusting the wire value; the REST service's count is maintained by
    /// its clients and drifts.
    pub answer_count: u32,
    /// Answers, embedded in the aggregate.
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// Vote state of the question.
    #[serde(default)]
    pub votes: VoteTally,
}

impl Question {
    /// Creates a question with no answers and no votes.
    pub fn new(
        id: impl Into<QuestionId>,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        author: AuthorRef,
        asked_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            tags,
            author,
            asked_at,
            answer_count: 0,
            answers: Vec::new(),
            votes: VoteTally::default(),
        }
    }

    /// Net vote score of this question.
    #[must_use]
    pub fn net_score(&self) -> i64 {
        self.votes.net()
    }

    /// Restores the aggregate invariants after ingesting wire data:
    /// answers that name a different owning question are dropped, and
    /// `answer_count` is recomputed from what remains.
    pub fn normalize(&mut self) {
        let own_id = self.id.clone();
        self.answers.retain(|a| a.question_id == own_id);
        self.answer_count = self.answers.len() as u32;
    }

    /// Looks up an embedded answer by id.
    #[must_use]
    pub fn answer(&self, id: &crate::AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|a| &a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnswerId;

    fn sample_question() -> Question {
        Question::new(
            "q1",
            "How do I reverse a slice?",
            "Looking for the idiomatic way.",
            vec!["rust".to_string()],
            AuthorRef::new("u1", "Ada"),
            Timestamp::from_secs(1_700_000_000),
        )
    }

    #[test]
    fn test_normalize_drops_dangling_answers() {
        let mut question = sample_question();
        question.answers.push(Answer::new(
            "a1",
            "q1",
            "slice.reverse()",
            AuthorRef::new("u2", "Grace"),
            Timestamp::from_secs(1_700_000_100),
        ));
        question.answers.push(Answer::new(
            "a2",
            "some-other-question",
            "stray answer",
            AuthorRef::new("u3", "Linus"),
            Timestamp::from_secs(1_700_000_200),
        ));
        question.answer_count = 99;

        question.normalize();

        assert_eq!(question.answers.len(), 1);
        assert_eq!(question.answer_count, 1);
        assert!(question.answer(&AnswerId::new("a1")).is_some());
        assert!(question.answer(&AnswerId::new("a2")).is_none());
    }

    #[test]
    fn test_normalize_overrides_wire_answer_count() {
        let mut question = sample_question();
        question.answer_count = 7;
        question.normalize();
        assert_eq!(question.answer_count, 0);
    }
}
