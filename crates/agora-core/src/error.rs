//! Errors surfaced by the synchronizer.

use agora_backend::BackendError;
use thiserror::Error;

/// Why a command did not complete normally.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another command for the same target is still running. Nothing was
    /// submitted; retrying after the in-flight command settles is safe.
    #[error("{target} already has an update in flight")]
    Busy {
        /// Display form of the busy target.
        target: String,
    },

    /// The write itself failed (or never left the process, for
    /// validation failures). The board is unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The write was confirmed, but re-fetching the result failed. The
    /// mutation is on the backend; the local view is merely behind until
    /// a later refresh.
    #[error("the change was saved, but refreshing the view failed: {source}")]
    RefreshFailed {
        /// What went wrong during the refresh.
        source: BackendError,
    },
}

impl SyncError {
    /// True when the underlying mutation is known to have landed.
    #[must_use]
    pub const fn write_confirmed(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. })
    }
}

/// Result type for synchronizer commands.
pub type Result<T> = std::result::Result<T, SyncError>;
