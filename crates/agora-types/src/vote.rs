//! Vote primitives: direction, target, and per-entity tallies.

use crate::{AnswerId, QuestionId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// An upvote.
    Up,
    /// A downvote.
    Down,
}

impl VoteDirection {
    /// True for an upvote. The ledger contract takes votes as a boolean.
    #[must_use]
    pub const fn is_upvote(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// What a vote lands on.
///
/// Answer targets carry the owning question because answer-level
/// operations always refresh the whole owning aggregate afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteTarget {
    /// A vote on a question.
    Question(QuestionId),
    /// A vote on an answer of the given question.
    Answer {
        /// The question the answer belongs to.
        question: QuestionId,
        /// The answer being voted on.
        answer: AnswerId,
    },
}

impl VoteTarget {
    /// The question aggregate this target lives in.
    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        match self {
            Self::Question(id) => id,
            Self::Answer { question, .. } => question,
        }
    }

    /// Returns "question" or "answer".
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Question(_) => "question",
            Self::Answer { .. } => "answer",
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question {id}"),
            Self::Answer { question, answer } => {
                write!(f, "answer {answer} of question {question}")
            }
        }
    }
}

/// Vote state attached to a question or answer.
///
/// The REST service stores the actual voter ids on each document, so
/// tallies are derived from the lists. The ledger only exposes aggregate
/// counts, in which case the voter lists stay empty and the counts stand
/// alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Number of upvotes.
    pub up: u64,
    /// Number of downvotes.
    pub down: u64,
    /// Ids of users who upvoted, when the backend exposes them.
    #[serde(default)]
    pub up_voters: Vec<UserId>,
    /// Ids of users who downvoted, when the backend exposes them.
    #[serde(default)]
    pub down_voters: Vec<UserId>,
}

impl VoteTally {
    /// Builds a tally from explicit voter lists (REST documents).
    #[must_use]
    pub fn from_voters(up_voters: Vec<UserId>, down_voters: Vec<UserId>) -> Self {
        Self {
            up: up_voters.len() as u64,
            down: down_voters.len() as u64,
            up_voters,
            down_voters,
        }
    }

    /// Builds a tally from aggregate counts (ledger records).
    #[must_use]
    pub const fn from_counts(up: u64, down: u64) -> Self {
        Self {
            up,
            down,
            up_voters: Vec::new(),
            down_voters: Vec::new(),
        }
    }

    /// Net score: upvotes minus downvotes. May be negative.
    #[must_use]
    pub fn net(&self) -> i64 {
        let up = i64::try_from(self.up).unwrap_or(i64::MAX);
        let down = i64::try_from(self.down).unwrap_or(i64::MAX);
        up.saturating_sub(down)
    }

    /// Whether the given user appears in either voter list.
    ///
    /// Always false for tally-only backends; callers that need an
    /// authoritative answer ask the backend instead.
    #[must_use]
    pub fn contains(&self, voter: &UserId) -> bool {
        self.up_voters.contains(voter) || self.down_voters.contains(voter)
    }
}
