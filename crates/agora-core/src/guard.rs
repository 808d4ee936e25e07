//! # Vote Guard
//!
//! Prior-vote knowledge in front of the backend, memoized per (voter,
//! target) for the life of the session. A vote is permanent on both
//! backends, so a cached answer never expires; it is only ever upgraded
//! from "not voted" to "voted" after a confirmed vote write.
//!
//! The guard is advisory. A failed lookup reports "not voted" (the write
//! path enforces the one-vote rule authoritatively) and is not cached,
//! so a later check asks the backend again.

use agora_backend::BoardBackend;
use agora_types::{UserId, VoteTarget};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoized prior-vote lookups.
pub struct VoteGuard {
    backend: Arc<dyn BoardBackend>,
    known: RwLock<HashMap<(UserId, VoteTarget), bool>>,
}

impl VoteGuard {
    /// Creates a guard over the given backend.
    pub fn new(backend: Arc<dyn BoardBackend>) -> Self {
        Self {
            backend,
            known: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `voter` is known to have voted on `target`.
    ///
    /// Hits the backend at most once per definitive answer; lookup
    /// failures fail open to `false` without being cached.
    pub async fn check(&self, target: &VoteTarget, voter: &UserId) -> bool {
        let key = (voter.clone(), target.clone());
        if let Some(&known) = self.known.read().get(&key) {
            return known;
        }
        match self.backend.has_voted(target, voter).await {
            Ok(voted) => {
                self.known.write().insert(key, voted);
                voted
            }
            Err(e) => {
                tracing::debug!(
                    target = %target,
                    voter = %voter,
                    error = %e,
                    "Prior-vote lookup failed, treating as not voted"
                );
                false
            }
        }
    }

    /// Records a confirmed vote so later checks stay local.
    pub fn mark_voted(&self, target: &VoteTarget, voter: &UserId) {
        self.known
            .write()
            .insert((voter.clone(), target.clone()), true);
    }

    /// Forgets everything. Called when the signed-in identity changes.
    pub fn reset(&self) {
        let mut known = self.known.write();
        tracing::debug!(entries = known.len(), "Resetting vote guard");
        known.clear();
    }
}
