//! # Agora Types
//!
//! Common types for the Agora Q&A board: identifiers, the question and
//! answer entities, vote primitives, draft validation, and user identity.
//!
//! Everything here is backend-neutral. The REST service and the ledger
//! encode these concepts differently on the wire; their adapters normalize
//! both encodings into the types in this crate.

pub mod answer;
pub mod draft;
pub mod error;
pub mod id;
pub mod question;
pub mod tag;
pub mod timestamp;
pub mod user;
pub mod vote;

pub use answer::Answer;
pub use draft::{NewAnswer, NewQuestion};
pub use error::{Result, ValidationError};
pub use id::{AnswerId, QuestionId, UserId};
pub use question::Question;
pub use tag::{find_tag, Tag, BUILTIN_TAGS};
pub use timestamp::Timestamp;
pub use user::{AuthorRef, UserProfile};
pub use vote::{VoteDirection, VoteTally, VoteTarget};
