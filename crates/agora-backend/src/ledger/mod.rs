//! Ledger variant: adapter, contract surface, and in-memory sim.

pub mod backend;
pub mod memory;
pub mod traits;

pub use backend::LedgerBackend;
pub use memory::MemoryLedger;
pub use traits::{
    LedgerAnswer, LedgerCallError, LedgerQuestion, LedgerQuestionDetails, LedgerResult,
    LedgerUserStats, QuestionLedger,
};
