//! The ledger variant of [`BoardBackend`].

use super::traits::{
    LedgerAnswer, LedgerCallError, LedgerQuestion, LedgerUserStats, QuestionLedger,
};
use crate::{BackendError, BoardBackend, Result};
use agora_types::{
    Answer, AnswerId, AuthorRef, NewAnswer, NewQuestion, Question, QuestionId, Timestamp, UserId,
    VoteDirection, VoteTally, VoteTarget,
};
use async_trait::async_trait;
use primitive_types::U256;

/// Board backend over the on-chain contract.
///
/// Contract ids are unsigned 256-bit sequence numbers; they surface as
/// decimal strings in the common id types. Votes arrive as aggregate
/// tallies (the chain does not enumerate voters), a question's single
/// category becomes a one-element tag list, and content can never be
/// deleted.
pub struct LedgerBackend<L> {
    ledger: L,
}

impl<L: QuestionLedger> LedgerBackend<L> {
    /// Wraps a contract binding.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// The underlying contract binding.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Token accounting for a wallet.
    pub async fn user_stats(&self, address: &UserId) -> Result<LedgerUserStats> {
        self.ledger
            .get_user_stats(address.as_str())
            .await
            .map_err(|e| map_call(e, "wallet", address.as_str()))
    }

    /// Withdraws the connected wallet's earned tokens.
    pub async fn withdraw(&self) -> Result<()> {
        self.ledger
            .withdraw_tokens()
            .await
            .map_err(|e| map_call(e, "wallet", ""))
    }
}

/// Renders a contract id as the common id encoding.
fn render_id(id: U256) -> String {
    id.to_string()
}

/// Parses a common id back into a contract id.
///
/// Ids that were never minted by a ledger (a REST hex id, say) cannot
/// refer to anything here, so the parse failure is a `NotFound`.
fn parse_id(kind: &'static str, id: &str) -> Result<U256> {
    U256::from_dec_str(id).map_err(|_| BackendError::not_found(kind, id))
}

/// Saturating narrowing for tallies and timestamps.
fn clamp_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.low_u64()
    }
}

/// Folds a failed contract call into the error taxonomy.
fn map_call(e: LedgerCallError, kind: &'static str, id: &str) -> BackendError {
    match e {
        LedgerCallError::Transport(m) => BackendError::Unavailable(m),
        LedgerCallError::Reverted(reason) => {
            let lower = reason.to_ascii_lowercase();
            if lower.contains("already voted") {
                BackendError::AlreadyVoted {
                    target: format!("{kind} {id}"),
                }
            } else if lower.contains("does not exist") || lower.contains("not found") {
                BackendError::not_found(kind, id)
            } else {
                BackendError::Rejected(reason)
            }
        }
    }
}

impl From<LedgerQuestion> for Question {
    fn from(record: LedgerQuestion) -> Self {
        let address = record.author;
        let tags = if record.category.is_empty() {
            Vec::new()
        } else {
            vec![record.category]
        };
        Self {
            id: QuestionId::new(render_id(record.id)),
            title: record.title,
            body: record.content,
            tags,
            author: AuthorRef::new(address.clone(), address),
            asked_at: Timestamp::from_secs(clamp_u64(record.timestamp) as i64),
            answer_count: 0,
            answers: Vec::new(),
            votes: VoteTally::from_counts(clamp_u64(record.upvotes), clamp_u64(record.downvotes)),
        }
    }
}

impl From<LedgerAnswer> for Answer {
    fn from(record: LedgerAnswer) -> Self {
        let address = record.author;
        let mut answer = Answer::new(
            render_id(record.id),
            render_id(record.question_id),
            record.content,
            AuthorRef::new(address.clone(), address),
            Timestamp::from_secs(clamp_u64(record.timestamp) as i64),
        );
        answer.votes =
            VoteTally::from_counts(clamp_u64(record.upvotes), clamp_u64(record.downvotes));
        answer
    }
}

#[async_trait]
impl<L: QuestionLedger> BoardBackend for LedgerBackend<L> {
    fn name(&self) -> &'static str {
        "ledger"
    }

    async fn fetch_all(&self) -> Result<Vec<Question>> {
        let mut records = self
            .ledger
            .get_all_questions()
            .await
            .map_err(|e| map_call(e, "question", ""))?;
        // Sequence numbers only grow, so id order is creation order.
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records.into_iter().map(Question::from).collect())
    }

    async fn fetch_question(&self, id: &QuestionId) -> Result<Question> {
        let raw = parse_id("question", id.as_str())?;
        let details = self
            .ledger
            .get_question_details(raw)
            .await
            .map_err(|e| map_call(e, "question", id.as_str()))?;
        let mut question = Question::from(details.question);
        question.answers = details.answers.into_iter().map(Answer::from).collect();
        question.answer_count = question.answers.len() as u32;
        Ok(question)
    }

    async fn create_question(&self, draft: &NewQuestion, _author: &AuthorRef) -> Result<()> {
        draft.validate()?;
        // The contract files a question under exactly one category; the
        // first tag wins and the rest stay client-side.
        let category = draft.tags.first().map(String::as_str).unwrap_or_default();
        if draft.tags.len() > 1 {
            tracing::debug!(
                dropped = draft.tags.len() - 1,
                "Ledger keeps only the first tag as category"
            );
        }
        self.ledger
            .post_question(&draft.title, category, &draft.body)
            .await
            .map_err(|e| map_call(e, "question", ""))
    }

    async fn create_answer(
        &self,
        question_id: &QuestionId,
        draft: &NewAnswer,
        _author: &AuthorRef,
    ) -> Result<()> {
        draft.validate()?;
        let raw = parse_id("question", question_id.as_str())?;
        self.ledger
            .post_answer(raw, &draft.body)
            .await
            .map_err(|e| map_call(e, "question", question_id.as_str()))
    }

    async fn vote_question(
        &self,
        id: &QuestionId,
        direction: VoteDirection,
        _voter: &UserId,
    ) -> Result<()> {
        let raw = parse_id("question", id.as_str())?;
        self.ledger
            .vote_question(raw, direction.is_upvote())
            .await
            .map_err(|e| map_call(e, "question", id.as_str()))
    }

    async fn vote_answer(
        &self,
        _question_id: &QuestionId,
        answer_id: &AnswerId,
        direction: VoteDirection,
        _voter: &UserId,
    ) -> Result<()> {
        let raw = parse_id("answer", answer_id.as_str())?;
        self.ledger
            .vote_answer(raw, direction.is_upvote())
            .await
            .map_err(|e| map_call(e, "answer", answer_id.as_str()))
    }

    async fn has_voted(&self, target: &VoteTarget, voter: &UserId) -> Result<bool> {
        match target {
            // No question-level lookup on the contract; the vote call
            // itself reverts on a repeat.
            VoteTarget::Question(_) => Ok(false),
            VoteTarget::Answer { answer, .. } => {
                let raw = parse_id("answer", answer.as_str())?;
                self.ledger
                    .has_user_voted_on_answer(voter.as_str(), raw)
                    .await
                    .map_err(|e| map_call(e, "answer", answer.as_str()))
            }
        }
    }

    async fn delete_question(&self, _id: &QuestionId) -> Result<()> {
        Err(BackendError::rejected(
            "the ledger does not support removing content",
        ))
    }

    async fn delete_answer(&self, _question_id: &QuestionId, _answer_id: &AnswerId) -> Result<()> {
        Err(BackendError::rejected(
            "the ledger does not support removing content",
        ))
    }
}
