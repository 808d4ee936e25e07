//! The contract-call surface of the on-chain board.
//!
//! How calls reach the chain (RPC transport, ABI encoding, signing) is
//! someone else's problem; implementations of [`QuestionLedger`] wrap
//! whatever binding the host application carries. Records here keep the
//! contract's own field types: 256-bit unsigned ids, tallies, and
//! timestamps, and `0x…` addresses as strings.

use async_trait::async_trait;
use primitive_types::U256;
use thiserror::Error;

/// A failed contract call.
#[derive(Debug, Clone, Error)]
pub enum LedgerCallError {
    /// The transport could not complete the call at all.
    #[error("ledger transport error: {0}")]
    Transport(String),

    /// The contract executed and reverted with the given reason.
    #[error("execution reverted: {0}")]
    Reverted(String),
}

/// Result type for contract calls.
pub type LedgerResult<T> = std::result::Result<T, LedgerCallError>;

/// A question record as the contract stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerQuestion {
    /// Sequence number assigned by the contract.
    pub id: U256,
    pub title: String,
    pub content: String,
    /// Wallet address of the asker.
    pub author: String,
    /// The single category the question was filed under.
    pub category: String,
    pub upvotes: U256,
    pub downvotes: U256,
    /// Block timestamp of creation, unix seconds.
    pub timestamp: U256,
}

/// An answer record as the contract stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnswer {
    pub id: U256,
    /// The question this answer belongs to.
    pub question_id: U256,
    pub content: String,
    /// Wallet address of the answerer.
    pub author: String,
    pub upvotes: U256,
    pub downvotes: U256,
    /// Block timestamp of creation, unix seconds.
    pub timestamp: U256,
}

/// A question with its answers, as returned by `getQuestionDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerQuestionDetails {
    pub question: LedgerQuestion,
    pub answers: Vec<LedgerAnswer>,
}

/// Token accounting for one wallet, as returned by `getUserStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerUserStats {
    /// Tokens earned from posting, lifetime.
    pub total_earned: U256,
    /// Tokens already withdrawn.
    pub total_withdrawn: U256,
    /// Tokens currently withdrawable.
    pub current_balance: U256,
}

/// The board contract's callable surface.
///
/// Writes are signed by the transport's connected wallet; the contract
/// takes the author from the transaction sender, which is why none of
/// the write calls carry an author argument.
#[async_trait]
pub trait QuestionLedger: Send + Sync {
    /// Reads every question. No answers are included at this level.
    async fn get_all_questions(&self) -> LedgerResult<Vec<LedgerQuestion>>;

    /// Reads one question together with its answers.
    async fn get_question_details(&self, id: U256) -> LedgerResult<LedgerQuestionDetails>;

    /// Submits a question and waits for confirmation.
    async fn post_question(&self, title: &str, category: &str, content: &str)
        -> LedgerResult<()>;

    /// Submits an answer and waits for confirmation.
    async fn post_answer(&self, question_id: U256, content: &str) -> LedgerResult<()>;

    /// Votes on a question. Reverts with "Already voted" on a repeat.
    async fn vote_question(&self, id: U256, is_upvote: bool) -> LedgerResult<()>;

    /// Votes on an answer. Reverts with "Already voted" on a repeat.
    async fn vote_answer(&self, id: U256, is_upvote: bool) -> LedgerResult<()>;

    /// Whether `address` has already voted on the given answer.
    ///
    /// This is the only prior-vote view the contract exposes; there is
    /// no question-level equivalent.
    async fn has_user_voted_on_answer(&self, address: &str, answer_id: U256)
        -> LedgerResult<bool>;

    /// Token accounting for a wallet.
    async fn get_user_stats(&self, address: &str) -> LedgerResult<LedgerUserStats>;

    /// Withdraws the connected wallet's earned tokens.
    async fn withdraw_tokens(&self) -> LedgerResult<()>;
}
