//! In-memory stand-in for the board contract.
//!
//! Used by the ledger adapter's tests and the CLI's ledger-sim mode.
//! The sim keeps the contract's observable behavior: sequence-numbered
//! records, revert reasons as strings, votes keyed by wallet, and token
//! rewards for posting.

use super::traits::{
    LedgerAnswer, LedgerCallError, LedgerQuestion, LedgerQuestionDetails, LedgerResult,
    LedgerUserStats, QuestionLedger,
};
use agora_types::Timestamp;
use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use std::collections::{HashMap, HashSet};

/// Tokens granted for posting a question.
const QUESTION_REWARD: u64 = 10;
/// Tokens granted for posting an answer.
const ANSWER_REWARD: u64 = 5;

#[derive(Default)]
struct LedgerState {
    questions: Vec<LedgerQuestion>,
    answers: Vec<LedgerAnswer>,
    question_votes: HashSet<(String, U256)>,
    answer_votes: HashSet<(String, U256)>,
    /// earned, withdrawn per wallet.
    balances: HashMap<String, (U256, U256)>,
    next_question: u64,
    next_answer: u64,
}

/// An in-memory [`QuestionLedger`].
pub struct MemoryLedger {
    /// The connected wallet; the sim's `msg.sender`.
    caller: String,
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Creates a ledger with the given connected wallet.
    pub fn with_caller(caller: impl Into<String>) -> Self {
        Self {
            caller: caller.into(),
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// The connected wallet address.
    #[must_use]
    pub fn caller(&self) -> &str {
        &self.caller
    }

    fn reward(state: &mut LedgerState, wallet: &str, amount: u64) {
        let entry = state
            .balances
            .entry(wallet.to_string())
            .or_insert((U256::zero(), U256::zero()));
        entry.0 += U256::from(amount);
    }

    fn block_time() -> U256 {
        U256::from(Timestamp::now().as_secs().max(0) as u64)
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::with_caller("0x00000000000000000000000000000000000000a1")
    }
}

#[async_trait]
impl QuestionLedger for MemoryLedger {
    async fn get_all_questions(&self) -> LedgerResult<Vec<LedgerQuestion>> {
        Ok(self.state.read().questions.clone())
    }

    async fn get_question_details(&self, id: U256) -> LedgerResult<LedgerQuestionDetails> {
        let state = self.state.read();
        let question = state
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| LedgerCallError::Reverted("Question does not exist".to_string()))?;
        let answers = state
            .answers
            .iter()
            .filter(|a| a.question_id == id)
            .cloned()
            .collect();
        Ok(LedgerQuestionDetails { question, answers })
    }

    async fn post_question(
        &self,
        title: &str,
        category: &str,
        content: &str,
    ) -> LedgerResult<()> {
        let mut state = self.state.write();
        state.next_question += 1;
        let id = U256::from(state.next_question);
        state.questions.push(LedgerQuestion {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author: self.caller.clone(),
            category: category.to_string(),
            upvotes: U256::zero(),
            downvotes: U256::zero(),
            timestamp: Self::block_time(),
        });
        Self::reward(&mut state, &self.caller, QUESTION_REWARD);
        Ok(())
    }

    async fn post_answer(&self, question_id: U256, content: &str) -> LedgerResult<()> {
        let mut state = self.state.write();
        if !state.questions.iter().any(|q| q.id == question_id) {
            return Err(LedgerCallError::Reverted(
                "Question does not exist".to_string(),
            ));
        }
        state.next_answer += 1;
        let id = U256::from(state.next_answer);
        state.answers.push(LedgerAnswer {
            id,
            question_id,
            content: content.to_string(),
            author: self.caller.clone(),
            upvotes: U256::zero(),
            downvotes: U256::zero(),
            timestamp: Self::block_time(),
        });
        Self::reward(&mut state, &self.caller, ANSWER_REWARD);
        Ok(())
    }

    async fn vote_question(&self, id: U256, is_upvote: bool) -> LedgerResult<()> {
        let mut state = self.state.write();
        if !state.questions.iter().any(|q| q.id == id) {
            return Err(LedgerCallError::Reverted(
                "Question does not exist".to_string(),
            ));
        }
        if !state.question_votes.insert((self.caller.clone(), id)) {
            return Err(LedgerCallError::Reverted("Already voted".to_string()));
        }
        let question = state
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| LedgerCallError::Reverted("Question does not exist".to_string()))?;
        if is_upvote {
            question.upvotes += U256::one();
        } else {
            question.downvotes += U256::one();
        }
        Ok(())
    }

    async fn vote_answer(&self, id: U256, is_upvote: bool) -> LedgerResult<()> {
        let mut state = self.state.write();
        if !state.answers.iter().any(|a| a.id == id) {
            return Err(LedgerCallError::Reverted(
                "Answer does not exist".to_string(),
            ));
        }
        if !state.answer_votes.insert((self.caller.clone(), id)) {
            return Err(LedgerCallError::Reverted("Already voted".to_string()));
        }
        let answer = state
            .answers
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LedgerCallError::Reverted("Answer does not exist".to_string()))?;
        if is_upvote {
            answer.upvotes += U256::one();
        } else {
            answer.downvotes += U256::one();
        }
        Ok(())
    }

    async fn has_user_voted_on_answer(
        &self,
        address: &str,
        answer_id: U256,
    ) -> LedgerResult<bool> {
        let state = self.state.read();
        Ok(state
            .answer_votes
            .contains(&(address.to_string(), answer_id)))
    }

    async fn get_user_stats(&self, address: &str) -> LedgerResult<LedgerUserStats> {
        let state = self.state.read();
        let (earned, withdrawn) = state
            .balances
            .get(address)
            .copied()
            .unwrap_or((U256::zero(), U256::zero()));
        Ok(LedgerUserStats {
            total_earned: earned,
            total_withdrawn: withdrawn,
            current_balance: earned.saturating_sub(withdrawn),
        })
    }

    async fn withdraw_tokens(&self) -> LedgerResult<()> {
        let mut state = self.state.write();
        let entry = state
            .balances
            .entry(self.caller.clone())
            .or_insert((U256::zero(), U256::zero()));
        let balance = entry.0.saturating_sub(entry.1);
        if balance.is_zero() {
            return Err(LedgerCallError::Reverted(
                "No tokens to withdraw".to_string(),
            ));
        }
        entry.1 = entry.0;
        Ok(())
    }
}
