//! Rendered-Document Model
//!
//! In-memory model of a translated document as the host page renders it:
//! an arena-backed node tree with attributes and character data, mutation
//! operations that emit ordered change records, and rendered-text
//! extraction.
//!
//! ## Core Design
//!
//! ```text
//! JSON snapshot → Document (arena) → mutation ops → MutationRecord batches
//!                      ↓
//!                NodeId (u32)
//!                      ↓
//!                rendered text (visible, not markup)
//! ```
//!
//! Nodes are never freed: removal unlinks a subtree but keeps it readable,
//! so consumers holding a `NodeId` can still extract its last-known text.

pub mod arena;
pub mod document;
pub mod error;
pub mod records;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::Document;
pub use error::{DomError, Result};
pub use records::{Batch, MutationKind, MutationRecord};
pub use serializer::{TextConfig, TextSerializer};
pub use types::*;
