//! # Write-Refresh Synchronizer
//!
//! Every mutation runs the same pipeline: submit the write to the
//! backend, await its confirmation, re-fetch the smallest aggregate the
//! write touched, and swap the result into the [`BoardStore`]. Neither
//! backend pushes change notifications, so the refetch is the only way
//! the local snapshot learns the authoritative outcome; it must never be
//! optimized away.
//!
//! One command may be in flight per target at a time. A second command
//! for a busy target is rejected with [`SyncError::Busy`] immediately,
//! never queued; commands for different targets run concurrently. The
//! synchronizer performs no retries; resubmitting a failed command is
//! the caller's decision.

use crate::error::{Result, SyncError};
use crate::guard::VoteGuard;
use crate::store::BoardStore;
use agora_backend::{BackendError, BoardBackend};
use agora_types::{
    AnswerId, AuthorRef, NewAnswer, NewQuestion, QuestionId, UserId, VoteDirection, VoteTarget,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// What a command locks while it runs.
///
/// Commands that rewrite the question list (asking, full refresh) key on
/// the board itself; everything else keys on the entity it mutates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// The question list as a whole.
    Board,
    /// A single question aggregate.
    Question(QuestionId),
    /// A single answer.
    Answer(AnswerId),
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board => f.write_str("the question board"),
            Self::Question(id) => write!(f, "question {id}"),
            Self::Answer(id) => write!(f, "answer {id}"),
        }
    }
}

impl From<&VoteTarget> for TargetKey {
    fn from(target: &VoteTarget) -> Self {
        match target {
            VoteTarget::Question(id) => Self::Question(id.clone()),
            VoteTarget::Answer { answer, .. } => Self::Answer(answer.clone()),
        }
    }
}

/// How a completed command left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The refresh ticket the command ran under.
    pub ticket: u64,
    /// Whether the refresh result became the current snapshot. `false`
    /// means a newer refresh had already landed and this one was
    /// discarded as stale; the command itself still succeeded.
    pub applied: bool,
}

/// Orchestrates submit, confirm, refresh, notify.
pub struct Synchronizer {
    backend: Arc<dyn BoardBackend>,
    store: Arc<BoardStore>,
    guard: Arc<VoteGuard>,
    tickets: AtomicU64,
    in_flight: Mutex<HashSet<TargetKey>>,
}

impl Synchronizer {
    /// Builds a synchronizer over the given backend with a fresh store
    /// and vote guard.
    #[must_use]
    pub fn new(backend: Arc<dyn BoardBackend>) -> Self {
        let guard = Arc::new(VoteGuard::new(backend.clone()));
        Self {
            backend,
            store: Arc::new(BoardStore::new()),
            guard,
            tickets: AtomicU64::new(0),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The store commands refresh into.
    #[must_use]
    pub fn store(&self) -> &Arc<BoardStore> {
        &self.store
    }

    /// The vote guard consulted before vote submissions.
    #[must_use]
    pub fn guard(&self) -> &Arc<VoteGuard> {
        &self.guard
    }

    /// Forgets per-identity state. Call when the signed-in user or
    /// connected wallet changes.
    pub fn switch_identity(&self) {
        self.guard.reset();
    }

    /// Fetches the full question list and replaces the snapshot.
    pub async fn refresh(&self) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Board)?;
        let span = self.command_span("refresh", &flight.key);
        async {
            let ticket = self.next_ticket();
            let questions = self.backend.fetch_all().await?;
            let applied = self.store.replace_all(ticket, questions);
            tracing::info!(ticket, applied, "Board refreshed");
            Ok(Outcome { ticket, applied })
        }
        .instrument(span)
        .await
    }

    /// Re-fetches one question aggregate.
    ///
    /// A question the backend no longer knows is dropped from the store
    /// and reported as [`BackendError::NotFound`].
    pub async fn refresh_question(&self, id: &QuestionId) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Question(id.clone()))?;
        let span = self.command_span("refresh_question", &flight.key);
        async {
            let ticket = self.next_ticket();
            match self.backend.fetch_question(id).await {
                Ok(question) => {
                    let applied = self.store.replace_question(ticket, question);
                    tracing::info!(question_id = %id, ticket, applied, "Question refreshed");
                    Ok(Outcome { ticket, applied })
                }
                Err(e @ BackendError::NotFound { .. }) => {
                    self.store.remove_question(ticket, id);
                    tracing::warn!(question_id = %id, "Question vanished from the backend");
                    Err(e.into())
                }
                Err(e) => Err(e.into()),
            }
        }
        .instrument(span)
        .await
    }

    /// Submits a new question, then refreshes the full list.
    ///
    /// The draft is validated locally first; an invalid draft fails with
    /// [`BackendError::Validation`] before anything is submitted.
    pub async fn ask_question(&self, draft: &NewQuestion, author: &AuthorRef) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Board)?;
        let span = self.command_span("ask_question", &flight.key);
        async {
            draft.validate().map_err(BackendError::from)?;
            self.backend.create_question(draft, author).await?;
            tracing::debug!(title = %draft.title, "Question accepted, refreshing list");
            self.refresh_all_after_write().await
        }
        .instrument(span)
        .await
    }

    /// Submits an answer, then refreshes the owning question.
    ///
    /// Like [`ask_question`](Self::ask_question), the draft is validated
    /// locally before the backend sees it.
    pub async fn post_answer(
        &self,
        question_id: &QuestionId,
        draft: &NewAnswer,
        author: &AuthorRef,
    ) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Question(question_id.clone()))?;
        let span = self.command_span("post_answer", &flight.key);
        async {
            draft.validate().map_err(BackendError::from)?;
            self.backend
                .create_answer(question_id, draft, author)
                .await?;
            tracing::debug!(question_id = %question_id, "Answer accepted, refreshing question");
            self.refresh_question_after_write(question_id).await
        }
        .instrument(span)
        .await
    }

    /// Casts a vote, then refreshes the owning question.
    ///
    /// The vote guard is consulted first: a known prior vote fails with
    /// [`BackendError::AlreadyVoted`] without submitting anything. The
    /// backend remains the authority either way, and its own
    /// already-voted refusal also lands in the guard so the next attempt
    /// fails locally.
    pub async fn vote(
        &self,
        target: &VoteTarget,
        direction: VoteDirection,
        voter: &UserId,
    ) -> Result<Outcome> {
        let flight = self.begin(TargetKey::from(target))?;
        let span = self.command_span("vote", &flight.key);
        async {
            if self.guard.check(target, voter).await {
                tracing::info!(target = %target, voter = %voter, "Vote blocked by prior vote");
                return Err(BackendError::already_voted(target).into());
            }
            let submitted = match target {
                VoteTarget::Question(id) => {
                    self.backend.vote_question(id, direction, voter).await
                }
                VoteTarget::Answer { question, answer } => {
                    self.backend
                        .vote_answer(question, answer, direction, voter)
                        .await
                }
            };
            match submitted {
                Ok(()) => {
                    // Marked before subscribers hear about the refresh, so
                    // no observer can see the vote as still available.
                    self.guard.mark_voted(target, voter);
                }
                Err(e @ BackendError::AlreadyVoted { .. }) => {
                    self.guard.mark_voted(target, voter);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
            tracing::debug!(target = %target, %direction, "Vote confirmed, refreshing question");
            self.refresh_question_after_write(target.question_id()).await
        }
        .instrument(span)
        .await
    }

    /// Deletes a question, then refreshes the full list.
    pub async fn delete_question(&self, id: &QuestionId) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Question(id.clone()))?;
        let span = self.command_span("delete_question", &flight.key);
        async {
            self.backend.delete_question(id).await?;
            tracing::debug!(question_id = %id, "Question deleted, refreshing list");
            self.refresh_all_after_write().await
        }
        .instrument(span)
        .await
    }

    /// Deletes an answer, then refreshes the owning question.
    pub async fn delete_answer(
        &self,
        question_id: &QuestionId,
        answer_id: &AnswerId,
    ) -> Result<Outcome> {
        let flight = self.begin(TargetKey::Answer(answer_id.clone()))?;
        let span = self.command_span("delete_answer", &flight.key);
        async {
            self.backend.delete_answer(question_id, answer_id).await?;
            tracing::debug!(
                question_id = %question_id,
                answer_id = %answer_id,
                "Answer deleted, refreshing question"
            );
            self.refresh_question_after_write(question_id).await
        }
        .instrument(span)
        .await
    }

    /// The refresh leg of a confirmed write: full list.
    ///
    /// Failures here become [`SyncError::RefreshFailed`]; the write
    /// already landed and the error must not claim otherwise.
    async fn refresh_all_after_write(&self) -> Result<Outcome> {
        let ticket = self.next_ticket();
        match self.backend.fetch_all().await {
            Ok(questions) => {
                let applied = self.store.replace_all(ticket, questions);
                tracing::info!(ticket, applied, "Write confirmed and board refreshed");
                Ok(Outcome { ticket, applied })
            }
            Err(source) => {
                tracing::warn!(error = %source, "Write confirmed but the list refresh failed");
                Err(SyncError::RefreshFailed { source })
            }
        }
    }

    /// The refresh leg of a confirmed write: one aggregate.
    async fn refresh_question_after_write(&self, id: &QuestionId) -> Result<Outcome> {
        let ticket = self.next_ticket();
        match self.backend.fetch_question(id).await {
            Ok(question) => {
                let applied = self.store.replace_question(ticket, question);
                tracing::info!(question_id = %id, ticket, applied, "Write confirmed and question refreshed");
                Ok(Outcome { ticket, applied })
            }
            Err(source) => {
                // Covers NotFound too: a question that disappeared between
                // the write and the refetch is a refresh problem, not a
                // write failure.
                tracing::warn!(question_id = %id, error = %source, "Write confirmed but the question refresh failed");
                Err(SyncError::RefreshFailed { source })
            }
        }
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn begin(&self, key: TargetKey) -> Result<Flight<'_>> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(key.clone()) {
            tracing::debug!(target = %key, "Rejecting command, target busy");
            return Err(SyncError::Busy {
                target: key.to_string(),
            });
        }
        Ok(Flight {
            in_flight: &self.in_flight,
            key,
        })
    }

    fn command_span(&self, command: &'static str, key: &TargetKey) -> tracing::Span {
        tracing::info_span!(
            "board_command",
            %command,
            command_id = %Uuid::new_v4(),
            target = %key,
            backend = self.backend.name(),
        )
    }
}

/// Releases the single-flight slot when the command settles, success or
/// not.
struct Flight<'a> {
    in_flight: &'a Mutex<HashSet<TargetKey>>,
    key: TargetKey,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_backend::MemoryBackend;
    use agora_types::Question;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use tokio::sync::Notify;

    fn author() -> AuthorRef {
        AuthorRef::new("u1", "Ada")
    }

    fn draft(title: &str) -> NewQuestion {
        NewQuestion::new(title, "body text", vec!["rust".to_string()])
    }

    fn memory_sync() -> Synchronizer {
        Synchronizer::new(Arc::new(MemoryBackend::new()))
    }

    /// Wraps the memory board, counting calls and optionally failing
    /// fetches or parking votes until released.
    struct HarnessBackend {
        inner: MemoryBackend,
        writes: AtomicUsize,
        fail_fetches: AtomicBool,
        blind_lookups: AtomicBool,
        park_votes: AtomicBool,
        vote_parked: Notify,
        vote_release: Notify,
    }

    impl HarnessBackend {
        fn new(inner: MemoryBackend) -> Self {
            Self {
                inner,
                writes: AtomicUsize::new(0),
                fail_fetches: AtomicBool::new(false),
                blind_lookups: AtomicBool::new(false),
                park_votes: AtomicBool::new(false),
                vote_parked: Notify::new(),
                vote_release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl BoardBackend for HarnessBackend {
        fn name(&self) -> &'static str {
            "harness"
        }
        async fn fetch_all(&self) -> agora_backend::Result<Vec<Question>> {
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(BackendError::unavailable("fetch disabled"));
            }
            self.inner.fetch_all().await
        }
        async fn fetch_question(&self, id: &QuestionId) -> agora_backend::Result<Question> {
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(BackendError::unavailable("fetch disabled"));
            }
            self.inner.fetch_question(id).await
        }
        async fn create_question(
            &self,
            draft: &NewQuestion,
            author: &AuthorRef,
        ) -> agora_backend::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create_question(draft, author).await
        }
        async fn create_answer(
            &self,
            question_id: &QuestionId,
            draft: &NewAnswer,
            author: &AuthorRef,
        ) -> agora_backend::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create_answer(question_id, draft, author).await
        }
        async fn vote_question(
            &self,
            id: &QuestionId,
            direction: VoteDirection,
            voter: &UserId,
        ) -> agora_backend::Result<()> {
            if self.park_votes.load(Ordering::SeqCst) {
                self.vote_parked.notify_one();
                self.vote_release.notified().await;
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.vote_question(id, direction, voter).await
        }
        async fn vote_answer(
            &self,
            question_id: &QuestionId,
            answer_id: &AnswerId,
            direction: VoteDirection,
            voter: &UserId,
        ) -> agora_backend::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner
                .vote_answer(question_id, answer_id, direction, voter)
                .await
        }
        async fn has_voted(
            &self,
            target: &VoteTarget,
            voter: &UserId,
        ) -> agora_backend::Result<bool> {
            if self.blind_lookups.load(Ordering::SeqCst) {
                return Ok(false);
            }
            self.inner.has_voted(target, voter).await
        }
        async fn delete_question(&self, id: &QuestionId) -> agora_backend::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_question(id).await
        }
        async fn delete_answer(
            &self,
            question_id: &QuestionId,
            answer_id: &AnswerId,
        ) -> agora_backend::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_answer(question_id, answer_id).await
        }
    }

    #[tokio::test]
    async fn test_ask_question_lands_in_the_store_newest_first() {
        let sync = memory_sync();

        sync.ask_question(&draft("first"), &author()).await.unwrap();
        sync.ask_question(&draft("second"), &author()).await.unwrap();

        let questions = sync.store().questions();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].title, "second");
        assert_eq!(questions[0].answer_count, 0);
        assert_eq!(sync.store().generation(), 2);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_the_backend() {
        let backend = Arc::new(HarnessBackend::new(MemoryBackend::new()));
        let sync = Synchronizer::new(backend.clone());

        let err = sync
            .ask_question(&NewQuestion::new("", "", vec![]), &author())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Backend(BackendError::Validation(_))
        ));

        // An empty answer body fails the same way, even for a question
        // the backend has never heard of: validation runs first.
        let err = sync
            .post_answer(&QuestionId::new("no-such-question"), &NewAnswer::new(""), &author())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Backend(BackendError::Validation(_))
        ));

        assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
        assert_eq!(sync.store().generation(), 0);
    }

    #[tokio::test]
    async fn test_post_answer_refreshes_only_the_owning_question() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        memory.seed_question("untouched", "body", vec!["go".to_string()], author());
        let sync = Synchronizer::new(Arc::new(memory));
        sync.refresh().await.unwrap();
        let before = sync.store().generation();

        sync.post_answer(&qid, &NewAnswer::new("use rev()"), &author())
            .await
            .unwrap();

        let stored = sync.store().question(&qid).unwrap();
        assert_eq!(stored.answer_count, 1);
        assert_eq!(stored.answers[0].body, "use rev()");
        // One targeted replace, not a second full one.
        assert_eq!(sync.store().generation(), before + 1);
        assert_eq!(sync.store().len(), 2);
    }

    #[tokio::test]
    async fn test_second_vote_fails_already_voted_with_one_upvote_counted() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let sync = Synchronizer::new(Arc::new(memory));
        let target = VoteTarget::Question(qid.clone());
        let voter = UserId::new("u2");

        sync.vote(&target, VoteDirection::Up, &voter).await.unwrap();
        let err = sync
            .vote(&target, VoteDirection::Up, &voter)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Backend(BackendError::AlreadyVoted { .. })
        ));
        let stored = sync.store().question(&qid).unwrap();
        assert_eq!(stored.net_score(), 1);
        assert!(sync.guard().check(&target, &voter).await);
    }

    #[tokio::test]
    async fn test_backend_already_voted_marks_the_guard() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let voter = UserId::new("u2");
        // Vote behind the synchronizer's back so its guard knows nothing.
        memory
            .vote_question(&qid, VoteDirection::Up, &voter)
            .await
            .unwrap();
        let backend = Arc::new(HarnessBackend::new(memory));
        // Lookups claim "not voted", so the submission itself must refuse.
        backend.blind_lookups.store(true, Ordering::SeqCst);

        let sync = Synchronizer::new(backend.clone());
        let target = VoteTarget::Question(qid);
        let err = sync
            .vote(&target, VoteDirection::Down, &voter)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Backend(BackendError::AlreadyVoted { .. })
        ));
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);

        // The refusal landed in the guard: the next attempt fails locally
        // even though lookups still say "not voted".
        let err = sync
            .vote(&target, VoteDirection::Down, &voter)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Backend(BackendError::AlreadyVoted { .. })
        ));
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_after_write_is_distinct_and_keeps_old_snapshot() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let backend = Arc::new(HarnessBackend::new(memory));
        let sync = Synchronizer::new(backend.clone());
        sync.refresh().await.unwrap();

        backend.fail_fetches.store(true, Ordering::SeqCst);
        let err = sync
            .post_answer(&qid, &NewAnswer::new("posted anyway"), &author())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::RefreshFailed { .. }));
        assert!(err.write_confirmed());
        // The store still serves the pre-write snapshot.
        assert_eq!(sync.store().question(&qid).unwrap().answer_count, 0);

        // A later refresh catches up.
        backend.fail_fetches.store(false, Ordering::SeqCst);
        sync.refresh_question(&qid).await.unwrap();
        assert_eq!(sync.store().question(&qid).unwrap().answer_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_target_command_is_busy() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let backend = Arc::new(HarnessBackend::new(memory));
        backend.park_votes.store(true, Ordering::SeqCst);
        let sync = Arc::new(Synchronizer::new(backend.clone()));

        let first = {
            let sync = sync.clone();
            let target = VoteTarget::Question(qid.clone());
            tokio::spawn(async move {
                sync.vote(&target, VoteDirection::Up, &UserId::new("u2")).await
            })
        };
        backend.vote_parked.notified().await;

        // Same question: rejected immediately.
        let err = sync
            .vote(
                &VoteTarget::Question(qid.clone()),
                VoteDirection::Up,
                &UserId::new("u3"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Busy { .. }));

        // A different target is free to proceed.
        sync.ask_question(&draft("unrelated"), &author())
            .await
            .unwrap();

        backend.park_votes.store(false, Ordering::SeqCst);
        backend.vote_release.notify_one();
        first.await.unwrap().unwrap();

        // The slot is free again after completion.
        let err = sync
            .vote(
                &VoteTarget::Question(qid),
                VoteDirection::Up,
                &UserId::new("u2"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Backend(BackendError::AlreadyVoted { .. })
        ));
    }

    #[tokio::test]
    async fn test_busy_slot_is_released_after_a_failed_command() {
        let backend = Arc::new(HarnessBackend::new(MemoryBackend::new()));
        backend.fail_fetches.store(true, Ordering::SeqCst);
        let sync = Synchronizer::new(backend.clone());

        assert!(sync.refresh().await.is_err());
        backend.fail_fetches.store(false, Ordering::SeqCst);
        assert!(sync.refresh().await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_question_drops_it_from_the_snapshot() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        memory.seed_question("keep", "body", vec!["go".to_string()], author());
        let sync = Synchronizer::new(Arc::new(memory));
        sync.refresh().await.unwrap();

        sync.delete_question(&qid).await.unwrap();

        assert_eq!(sync.store().len(), 1);
        assert!(sync.store().question(&qid).is_none());
    }

    #[tokio::test]
    async fn test_delete_answer_shrinks_the_aggregate() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let aid = memory.seed_answer(&qid, "first", AuthorRef::new("u2", "Grace"));
        memory.seed_answer(&qid, "second", AuthorRef::new("u3", "Linus"));
        let sync = Synchronizer::new(Arc::new(memory));
        sync.refresh().await.unwrap();

        sync.delete_answer(&qid, &aid).await.unwrap();

        let stored = sync.store().question(&qid).unwrap();
        assert_eq!(stored.answer_count, 1);
        assert_eq!(stored.answers[0].body, "second");
    }

    #[tokio::test]
    async fn test_refresh_question_removes_a_vanished_aggregate() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let backend = Arc::new(memory);
        let sync = Synchronizer::new(backend.clone());
        sync.refresh().await.unwrap();

        backend.delete_question(&qid).await.unwrap();
        let err = sync.refresh_question(&qid).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Backend(BackendError::NotFound { .. })
        ));
        assert!(sync.store().question(&qid).is_none());
    }

    #[tokio::test]
    async fn test_idempotent_refresh_keeps_the_question_set() {
        let memory = MemoryBackend::new();
        memory.seed_question("a", "body", vec!["rust".to_string()], author());
        memory.seed_question("b", "body", vec!["go".to_string()], author());
        let sync = Synchronizer::new(Arc::new(memory));

        sync.refresh().await.unwrap();
        let first: Vec<_> = sync.store().questions();
        sync.refresh().await.unwrap();
        let second: Vec<_> = sync.store().questions();

        assert_eq!(first, second);
        assert_eq!(sync.store().generation(), 2);
    }

    #[tokio::test]
    async fn test_switch_identity_clears_the_guard() {
        let memory = MemoryBackend::new();
        let qid = memory.seed_question("q", "body", vec!["rust".to_string()], author());
        let sync = Synchronizer::new(Arc::new(memory));
        let target = VoteTarget::Question(qid);
        let voter = UserId::new("u2");

        sync.guard().mark_voted(&target, &voter);
        sync.switch_identity();
        // The memory backend has no such vote, so the fresh lookup says no.
        assert!(!sync.guard().check(&target, &voter).await);
    }
}
