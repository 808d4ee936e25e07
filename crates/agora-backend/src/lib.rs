//! # Agora Backend
//!
//! Backend adapters for the Agora Q&A board. One [`BoardBackend`] is
//! chosen at process start and everything above it stays unaware which:
//!
//! - [`RestBackend`] - the stateless JSON service (MongoDB-style ids,
//!   voter arrays, bearer-token auth)
//! - [`LedgerBackend`] - the on-chain contract (256-bit sequence ids,
//!   aggregate tallies, wallet identity, token rewards)
//! - [`MemoryBackend`] - an in-process board for tests and demos
//!
//! The adapters fold every transport failure and refusal into the shared
//! [`BackendError`] taxonomy, so callers reason about five error shapes
//! instead of status codes and revert strings.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod profile;
pub mod rest;
pub mod traits;

pub use error::{BackendError, Result};
pub use ledger::{LedgerBackend, MemoryLedger, QuestionLedger};
pub use memory::MemoryBackend;
pub use profile::{ProfileStore, StoredProfile};
pub use rest::{RestBackend, RestClient};
pub use traits::BoardBackend;
