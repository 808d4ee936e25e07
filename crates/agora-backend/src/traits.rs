//! The polymorphic backend surface.

use crate::Result;
use agora_types::{
    AnswerId, AuthorRef, NewAnswer, NewQuestion, Question, QuestionId, UserId, VoteDirection,
    VoteTarget,
};
use async_trait::async_trait;

/// A board backend: somewhere questions live and votes land.
///
/// Exactly one implementation is chosen at process start — the REST
/// service, the on-chain ledger, or the in-memory board — and everything
/// above this trait is unaware which. Neither production backend pushes
/// changes, so after every confirmed write the caller re-fetches the
/// affected data through `fetch_all`/`fetch_question`.
///
/// Capability gaps are honest rather than papered over: a backend that
/// cannot perform an operation returns [`BackendError::Rejected`] with a
/// message naming the gap (the REST service has no answer-vote route; the
/// ledger cannot delete).
///
/// [`BackendError::Rejected`]: crate::BackendError::Rejected
#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// A short name for logs: "rest", "ledger", or "memory".
    fn name(&self) -> &'static str;

    /// Fetches every question, newest first, with embedded answers and
    /// vote data.
    async fn fetch_all(&self) -> Result<Vec<Question>>;

    /// Fetches a single question with its embedded answers.
    async fn fetch_question(&self, id: &QuestionId) -> Result<Question>;

    /// Validates and submits a new question.
    ///
    /// Validation runs locally before any network traffic; an invalid
    /// draft fails with [`BackendError::Validation`] without the backend
    /// ever seeing it. The created question's id only becomes visible in
    /// the next fetch.
    ///
    /// [`BackendError::Validation`]: crate::BackendError::Validation
    async fn create_question(&self, draft: &NewQuestion, author: &AuthorRef) -> Result<()>;

    /// Validates and submits a new answer to the given question.
    async fn create_answer(
        &self,
        question_id: &QuestionId,
        draft: &NewAnswer,
        author: &AuthorRef,
    ) -> Result<()>;

    /// Records a vote on a question.
    async fn vote_question(
        &self,
        id: &QuestionId,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<()>;

    /// Records a vote on an answer.
    async fn vote_answer(
        &self,
        question_id: &QuestionId,
        answer_id: &AnswerId,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<()>;

    /// Best-effort lookup of whether `voter` already voted on `target`.
    ///
    /// This is advisory. Callers treat a failed lookup as "not voted"
    /// (the vote guard swallows the error) because the write path
    /// enforces the one-vote rule authoritatively.
    async fn has_voted(&self, target: &VoteTarget, voter: &UserId) -> Result<bool>;

    /// Removes a question and everything attached to it.
    async fn delete_question(&self, id: &QuestionId) -> Result<()>;

    /// Removes a single answer from a question.
    async fn delete_answer(&self, question_id: &QuestionId, answer_id: &AnswerId) -> Result<()>;
}
