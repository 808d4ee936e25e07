//! # Agora Core
//!
//! The synchronization core of the Agora Q&A board. Content lives on
//! exactly one backend per installation — the REST service or the
//! on-chain ledger — and neither pushes change notifications, so every
//! mutation here is a write followed by an explicit refetch of what the
//! write touched.
//!
//! ```text
//!   ask / answer / vote / delete
//!              |
//!              v
//!       +--------------+   submit, confirm    +--------------+
//!       | Synchronizer | -------------------> | BoardBackend |
//!       +--------------+ <------------------- +--------------+
//!          |        |       refetch result
//!          |        |
//!          |        +--> VoteGuard (prior-vote memo, fail-open)
//!          v
//!      +------------+  snapshots   +-----------+
//!      | BoardStore | -----------> | projector | --> view shapes
//!      +------------+  (atomic     +-----------+
//!            |          replace)
//!            +--> broadcast of applied generations
//! ```
//!
//! - [`store::BoardStore`] holds the normalized snapshot, replaced
//!   atomically and guarded against stale refresh results by tickets.
//! - [`guard::VoteGuard`] memoizes per-(voter, target) prior-vote facts.
//! - [`sync::Synchronizer`] runs each command through submit, confirm,
//!   refresh, notify, with single-flight per target and no retries.
//! - [`project`] turns stored aggregates into display shapes, purely.

pub mod error;
pub mod guard;
pub mod project;
pub mod store;
pub mod sync;

pub use error::{Result, SyncError};
pub use guard::VoteGuard;
pub use project::{
    detail, net_score, relative_time, summarize, AnswerView, QuestionDetail, QuestionSummary,
    DEFAULT_TITLE_BUDGET, NARROW_TITLE_BUDGET,
};
pub use store::{BoardStore, StoreUpdate};
pub use sync::{Outcome, Synchronizer, TargetKey};
