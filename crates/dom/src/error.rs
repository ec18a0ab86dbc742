//! Error types for document operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("node not found: {0}")]
    NodeNotFound(u32),

    #[error("invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("node {0} has no parent")]
    DetachedNode(u32),

    #[error("malformed document snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
