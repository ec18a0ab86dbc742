//! Error types for the editing core
//!
//! Recoverable conditions never surface here: untracked mutations are
//! skipped, input violations go through the error reporter, detached reads
//! succeed. What's left is host programming errors (bad node ids, broken
//! snapshots) and plumbing failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("document error: {0}")]
    Dom(#[from] dom::DomError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record channel closed")]
    ChannelClosed,
}
