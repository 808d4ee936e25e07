//! # Board Store
//!
//! The authoritative local snapshot of the board. Refreshes replace data
//! wholesale (the full board or one question aggregate); nothing edits a
//! stored question in place. Every applied replace bumps a generation
//! counter and fans a [`StoreUpdate`] out to subscribers.
//!
//! Refreshes race: a command may start refresh N, a later command may
//! start and finish refresh N+1 first. Each refresh therefore carries a
//! ticket issued when it started; the store remembers the ticket of the
//! last applied replace and silently discards results that arrive with
//! an older one.

use agora_types::{Question, QuestionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Capacity of the update channel. Subscribers that fall further behind
/// than this see a lag error, not stale data.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Sent to subscribers after every applied replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUpdate {
    /// The generation that just became current.
    pub generation: u64,
}

#[derive(Default)]
struct Snapshot {
    generation: u64,
    applied_ticket: u64,
    order: Vec<QuestionId>,
    questions: HashMap<QuestionId, Question>,
}

/// Normalized, atomically replaced question snapshot.
pub struct BoardStore {
    inner: RwLock<Snapshot>,
    update_tx: broadcast::Sender<StoreUpdate>,
}

impl BoardStore {
    /// Creates an empty store at generation zero.
    #[must_use]
    pub fn new() -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Snapshot::default()),
            update_tx,
        }
    }

    /// Replaces the whole board with a fresh snapshot.
    ///
    /// Questions are normalized on the way in (dangling answers dropped,
    /// answer counts recomputed) and kept in the given order. Returns
    /// `false` when the ticket is older than one already applied, in
    /// which case nothing changes and nobody is notified.
    pub fn replace_all(&self, ticket: u64, questions: Vec<Question>) -> bool {
        let generation;
        {
            let mut snap = self.inner.write();
            if ticket <= snap.applied_ticket {
                tracing::debug!(
                    ticket,
                    applied = snap.applied_ticket,
                    "Discarding stale full refresh"
                );
                return false;
            }
            let mut order = Vec::with_capacity(questions.len());
            let mut map = HashMap::with_capacity(questions.len());
            for mut question in questions {
                question.normalize();
                if !map.contains_key(&question.id) {
                    order.push(question.id.clone());
                }
                map.insert(question.id.clone(), question);
            }
            snap.order = order;
            snap.questions = map;
            snap.applied_ticket = ticket;
            snap.generation += 1;
            generation = snap.generation;
        }
        self.notify(generation);
        true
    }

    /// Replaces one question aggregate, leaving the rest of the board
    /// untouched. A question the store has never seen goes to the head
    /// of the order (it is newer than anything a previous snapshot
    /// holds). Same staleness rules as [`Self::replace_all`].
    pub fn replace_question(&self, ticket: u64, mut question: Question) -> bool {
        question.normalize();
        let generation;
        {
            let mut snap = self.inner.write();
            if ticket <= snap.applied_ticket {
                tracing::debug!(
                    ticket,
                    applied = snap.applied_ticket,
                    question_id = %question.id,
                    "Discarding stale question refresh"
                );
                return false;
            }
            if !snap.questions.contains_key(&question.id) {
                snap.order.insert(0, question.id.clone());
            }
            snap.applied_ticket = ticket;
            snap.questions.insert(question.id.clone(), question);
            snap.generation += 1;
            generation = snap.generation;
        }
        self.notify(generation);
        true
    }

    /// Records that a refresh found the question gone and drops it.
    ///
    /// Accepting the ticket without a removal (the question was already
    /// absent) is still an applied refresh, but subscribers only hear
    /// about actual changes.
    pub fn remove_question(&self, ticket: u64, id: &QuestionId) -> bool {
        let removed_generation;
        {
            let mut snap = self.inner.write();
            if ticket <= snap.applied_ticket {
                tracing::debug!(
                    ticket,
                    applied = snap.applied_ticket,
                    question_id = %id,
                    "Discarding stale removal"
                );
                return false;
            }
            snap.applied_ticket = ticket;
            if snap.questions.remove(id).is_none() {
                return true;
            }
            snap.order.retain(|q| q != id);
            snap.generation += 1;
            removed_generation = snap.generation;
        }
        self.notify(removed_generation);
        true
    }

    /// The current snapshot in order.
    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        let snap = self.inner.read();
        snap.order
            .iter()
            .filter_map(|id| snap.questions.get(id))
            .cloned()
            .collect()
    }

    /// One question by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<Question> {
        self.inner.read().questions.get(id).cloned()
    }

    /// The current generation. Starts at zero, bumps once per applied
    /// replace.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Number of questions in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// True when the snapshot holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to applied replaces. Updates arrive in generation
    /// order; a receiver that stops listening is simply dropped.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.update_tx.receiver_count()
    }

    fn notify(&self, generation: u64) {
        // With no subscribers this is a no-op, not an error.
        let _ = self.update_tx.send(StoreUpdate { generation });
        tracing::debug!(generation, "Applied board snapshot");
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{Answer, AuthorRef, Timestamp};

    fn question(id: &str) -> Question {
        Question::new(
            id,
            format!("title {id}"),
            "body",
            vec!["rust".to_string()],
            AuthorRef::new("u1", "Ada"),
            Timestamp::from_secs(1_700_000_000),
        )
    }

    #[test]
    fn test_replace_all_bumps_generation_and_notifies_once() {
        let store = BoardStore::new();
        let mut updates = store.subscribe();

        assert!(store.replace_all(1, vec![question("q1"), question("q2")]));

        assert_eq!(store.generation(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(
            updates.try_recv().unwrap(),
            StoreUpdate { generation: 1 }
        );
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let store = BoardStore::new();
        let mut updates = store.subscribe();

        assert!(store.replace_all(2, vec![question("newer")]));
        assert!(!store.replace_all(1, vec![question("older")]));

        assert_eq!(store.generation(), 1);
        assert_eq!(store.questions()[0].id, QuestionId::new("newer"));
        // Only the applied replace was announced.
        assert_eq!(updates.try_recv().unwrap().generation, 1);
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_stale_targeted_refresh_is_discarded() {
        let store = BoardStore::new();
        store.replace_all(5, vec![question("q1")]);

        let mut stale = question("q1");
        stale.title = "stale title".to_string();
        assert!(!store.replace_question(3, stale));

        assert_eq!(store.question(&QuestionId::new("q1")).unwrap().title, "title q1");
    }

    #[test]
    fn test_replace_question_merges_without_reordering() {
        let store = BoardStore::new();
        store.replace_all(1, vec![question("q2"), question("q1")]);

        let mut updated = question("q1");
        updated.title = "updated".to_string();
        assert!(store.replace_question(2, updated));

        let ids: Vec<_> = store.questions().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuestionId::new("q2"), QuestionId::new("q1")]);
        assert_eq!(store.question(&QuestionId::new("q1")).unwrap().title, "updated");
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_unknown_question_joins_at_the_head() {
        let store = BoardStore::new();
        store.replace_all(1, vec![question("q1")]);
        store.replace_question(2, question("q9"));

        let ids: Vec<_> = store.questions().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuestionId::new("q9"), QuestionId::new("q1")]);
    }

    #[test]
    fn test_remove_question_drops_it_and_keeps_ticket() {
        let store = BoardStore::new();
        let mut updates = store.subscribe();
        store.replace_all(1, vec![question("q1"), question("q2")]);

        assert!(store.remove_question(2, &QuestionId::new("q1")));
        assert_eq!(store.len(), 1);
        assert!(store.question(&QuestionId::new("q1")).is_none());

        // A stale full refresh from before the removal stays out.
        assert!(!store.replace_all(1, vec![question("q1"), question("q2")]));
        assert_eq!(store.len(), 1);

        assert_eq!(updates.try_recv().unwrap().generation, 1);
        assert_eq!(updates.try_recv().unwrap().generation, 2);
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_removing_an_absent_question_applies_silently() {
        let store = BoardStore::new();
        let mut updates = store.subscribe();
        store.replace_all(1, vec![question("q1")]);
        let _ = updates.try_recv();

        assert!(store.remove_question(2, &QuestionId::new("ghost")));
        assert_eq!(store.generation(), 1);
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_ingest_normalizes_aggregates() {
        let store = BoardStore::new();
        let mut q = question("q1");
        q.answers.push(Answer::new(
            "a1",
            "q1",
            "mine",
            AuthorRef::new("u2", "Grace"),
            Timestamp::from_secs(1_700_000_100),
        ));
        q.answers.push(Answer::new(
            "a2",
            "q-other",
            "dangling",
            AuthorRef::new("u3", "Linus"),
            Timestamp::from_secs(1_700_000_200),
        ));
        q.answer_count = 40;

        store.replace_all(1, vec![q]);

        let stored = store.question(&QuestionId::new("q1")).unwrap();
        assert_eq!(stored.answer_count, 1);
        assert_eq!(stored.answers.len(), 1);
        assert_eq!(stored.answers[0].id, agora_types::AnswerId::new("a1"));
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let store = BoardStore::new();
        let mut dup = question("q1");
        dup.title = "second copy".to_string();
        store.replace_all(1, vec![question("q1"), question("q2"), dup]);

        assert_eq!(store.len(), 2);
        let ids: Vec<_> = store.questions().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuestionId::new("q1"), QuestionId::new("q2")]);
        // The later copy wins the content.
        assert_eq!(store.question(&QuestionId::new("q1")).unwrap().title, "second copy");
    }

    #[test]
    fn test_subscriber_count_tracks_receivers() {
        let store = BoardStore::new();
        assert_eq!(store.subscriber_count(), 0);
        let rx = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(rx);
        assert_eq!(store.subscriber_count(), 0);
    }
}
