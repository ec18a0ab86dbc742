//! Mutation record types
//!
//! These are the fundamental change notifications emitted by document
//! mutation operations. Keep them minimal - one record per changed node,
//! delivered in batches in the order the changes happened.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An ordered group of records produced by one mutation turn
pub type Batch = Vec<MutationRecord>;

/// What kind of change a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Character data of a text-like node changed
    CharacterData,
    /// Children were added to or removed from an element
    ChildList,
}

/// A single observed change
///
/// For `CharacterData` the target is the node whose text changed.
/// For `ChildList` the target is the parent whose child list changed,
/// with the affected nodes listed in `added`/`removed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub added: SmallVec<[NodeId; 2]>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub removed: SmallVec<[NodeId; 2]>,
}

impl MutationRecord {
    /// Record a character-data change on `target`
    pub fn character_data(target: NodeId) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added: SmallVec::new(),
            removed: SmallVec::new(),
        }
    }

    /// Record a child insertion under `target`
    pub fn child_added(target: NodeId, child: NodeId) -> Self {
        let mut added = SmallVec::new();
        added.push(child);
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed: SmallVec::new(),
        }
    }

    /// Record a child removal under `target`
    pub fn child_removed(target: NodeId, child: NodeId) -> Self {
        let mut removed = SmallVec::new();
        removed.push(child);
        Self {
            kind: MutationKind::ChildList,
            target,
            added: SmallVec::new(),
            removed,
        }
    }
}
