//! In-memory board backend.
//!
//! Backs the core test suites and the CLI demo mode. Behaves like the
//! REST service where the two differ: voter ids are tracked per entity,
//! answers accept votes, and deletes are supported.

use crate::{BackendError, BoardBackend, Result};
use agora_types::{
    Answer, AnswerId, AuthorRef, NewAnswer, NewQuestion, Question, QuestionId, Timestamp, UserId,
    VoteDirection, VoteTarget,
};
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Default)]
struct BoardState {
    /// Questions in creation order; newest is last.
    questions: Vec<Question>,
    next_question: u64,
    next_answer: u64,
}

/// An in-memory implementation of [`BoardBackend`].
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<BoardState>,
}

impl MemoryBackend {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a question directly, bypassing validation. Returns its id.
    pub fn seed_question(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        author: AuthorRef,
    ) -> QuestionId {
        let mut state = self.state.write();
        state.next_question += 1;
        let id = QuestionId::new(format!("q{}", state.next_question));
        state.questions.push(Question::new(
            id.clone(),
            title,
            body,
            tags,
            author,
            Timestamp::now(),
        ));
        id
    }

    /// Inserts an answer directly, bypassing validation. Returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the question does not exist; seeding is test setup and
    /// a missing question is a broken fixture.
    pub fn seed_answer(
        &self,
        question_id: &QuestionId,
        body: impl Into<String>,
        author: AuthorRef,
    ) -> AnswerId {
        let mut state = self.state.write();
        state.next_answer += 1;
        let id = AnswerId::new(format!("a{}", state.next_answer));
        let answer = Answer::new(
            id.clone(),
            question_id.clone(),
            body,
            author,
            Timestamp::now(),
        );
        let question = state
            .questions
            .iter_mut()
            .find(|q| &q.id == question_id)
            .unwrap_or_else(|| panic!("seed_answer: no question {question_id}"));
        question.answers.push(answer);
        question.answer_count = question.answers.len() as u32;
        id
    }

    fn find_question<'a>(
        state: &'a mut BoardState,
        id: &QuestionId,
    ) -> Result<&'a mut Question> {
        state
            .questions
            .iter_mut()
            .find(|q| &q.id == id)
            .ok_or_else(|| BackendError::not_found("question", id.as_str()))
    }
}

#[async_trait]
impl BoardBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<Vec<Question>> {
        let state = self.state.read();
        Ok(state.questions.iter().rev().cloned().collect())
    }

    async fn fetch_question(&self, id: &QuestionId) -> Result<Question> {
        let state = self.state.read();
        state
            .questions
            .iter()
            .find(|q| &q.id == id)
            .cloned()
            .ok_or_else(|| BackendError::not_found("question", id.as_str()))
    }

    async fn create_question(&self, draft: &NewQuestion, author: &AuthorRef) -> Result<()> {
        draft.validate()?;
        self.seed_question(
            draft.title.clone(),
            draft.body.clone(),
            draft.tags.clone(),
            author.clone(),
        );
        Ok(())
    }

    async fn create_answer(
        &self,
        question_id: &QuestionId,
        draft: &NewAnswer,
        author: &AuthorRef,
    ) -> Result<()> {
        draft.validate()?;
        // Existence check up front so a bad id is NotFound, not a panic.
        {
            let mut state = self.state.write();
            Self::find_question(&mut state, question_id)?;
        }
        self.seed_answer(question_id, draft.body.clone(), author.clone());
        Ok(())
    }

    async fn vote_question(
        &self,
        id: &QuestionId,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<()> {
        let mut state = self.state.write();
        let question = Self::find_question(&mut state, id)?;
        if question.votes.contains(voter) {
            return Err(BackendError::already_voted(VoteTarget::Question(id.clone())));
        }
        match direction {
            VoteDirection::Up => question.votes.up_voters.push(voter.clone()),
            VoteDirection::Down => question.votes.down_voters.push(voter.clone()),
        }
        question.votes.up = question.votes.up_voters.len() as u64;
        question.votes.down = question.votes.down_voters.len() as u64;
        Ok(())
    }

    async fn vote_answer(
        &self,
        question_id: &QuestionId,
        answer_id: &AnswerId,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<()> {
        let mut state = self.state.write();
        let question = Self::find_question(&mut state, question_id)?;
        let answer = question
            .answers
            .iter_mut()
            .find(|a| &a.id == answer_id)
            .ok_or_else(|| BackendError::not_found("answer", answer_id.as_str()))?;
        if answer.votes.contains(voter) {
            return Err(BackendError::already_voted(VoteTarget::Answer {
                question: question_id.clone(),
                answer: answer_id.clone(),
            }));
        }
        match direction {
            VoteDirection::Up => answer.votes.up_voters.push(voter.clone()),
            VoteDirection::Down => answer.votes.down_voters.push(voter.clone()),
        }
        answer.votes.up = answer.votes.up_voters.len() as u64;
        answer.votes.down = answer.votes.down_voters.len() as u64;
        Ok(())
    }

    async fn has_voted(&self, target: &VoteTarget, voter: &UserId) -> Result<bool> {
        let state = self.state.read();
        let question = state
            .questions
            .iter()
            .find(|q| &q.id == target.question_id())
            .ok_or_else(|| {
                BackendError::not_found("question", target.question_id().as_str())
            })?;
        match target {
            VoteTarget::Question(_) => Ok(question.votes.contains(voter)),
            VoteTarget::Answer { answer, .. } => Ok(question
                .answer(answer)
                .is_some_and(|a| a.votes.contains(voter))),
        }
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<()> {
        let mut state = self.state.write();
        let before = state.questions.len();
        state.questions.retain(|q| &q.id != id);
        if state.questions.len() == before {
            return Err(BackendError::not_found("question", id.as_str()));
        }
        Ok(())
    }

    async fn delete_answer(&self, question_id: &QuestionId, answer_id: &AnswerId) -> Result<()> {
        let mut state = self.state.write();
        let question = Self::find_question(&mut state, question_id)?;
        let before = question.answers.len();
        question.answers.retain(|a| &a.id != answer_id);
        if question.answers.len() == before {
            return Err(BackendError::not_found("answer", answer_id.as_str()));
        }
        question.answer_count = question.answers.len() as u32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> AuthorRef {
        AuthorRef::new("u1", "Ada")
    }

    #[tokio::test]
    async fn test_fetch_all_returns_newest_first() {
        let backend = MemoryBackend::new();
        backend.seed_question("first", "body", vec!["rust".into()], author());
        backend.seed_question("second", "body", vec!["rust".into()], author());

        let questions = backend.fetch_all().await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].title, "second");
        assert_eq!(questions[1].title, "first");
    }

    #[tokio::test]
    async fn test_create_question_validates_before_writing() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_question(&NewQuestion::new("", "body", vec!["rust".into()]), &author())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
        assert!(backend.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_vote_is_refused() {
        let backend = MemoryBackend::new();
        let id = backend.seed_question("q", "body", vec!["rust".into()], author());
        let voter = UserId::new("u2");

        backend
            .vote_question(&id, VoteDirection::Up, &voter)
            .await
            .unwrap();
        let err = backend
            .vote_question(&id, VoteDirection::Down, &voter)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::AlreadyVoted { .. }));

        let question = backend.fetch_question(&id).await.unwrap();
        assert_eq!(question.votes.up, 1);
        assert_eq!(question.votes.down, 0);
    }

    #[tokio::test]
    async fn test_has_voted_sees_answer_votes() {
        let backend = MemoryBackend::new();
        let qid = backend.seed_question("q", "body", vec!["rust".into()], author());
        let aid = backend.seed_answer(&qid, "an answer", author());
        let voter = UserId::new("u2");
        let target = VoteTarget::Answer {
            question: qid.clone(),
            answer: aid.clone(),
        };

        assert!(!backend.has_voted(&target, &voter).await.unwrap());
        backend
            .vote_answer(&qid, &aid, VoteDirection::Up, &voter)
            .await
            .unwrap();
        assert!(backend.has_voted(&target, &voter).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_answer_recounts() {
        let backend = MemoryBackend::new();
        let qid = backend.seed_question("q", "body", vec!["rust".into()], author());
        let aid = backend.seed_answer(&qid, "an answer", author());

        backend.delete_answer(&qid, &aid).await.unwrap();
        let question = backend.fetch_question(&qid).await.unwrap();
        assert_eq!(question.answer_count, 0);
        assert!(question.answers.is_empty());
    }

    #[tokio::test]
    async fn test_missing_question_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .fetch_question(&QuestionId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }
}
