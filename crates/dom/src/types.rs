//! Core node types for the rendered-document tree.
//!
//! Key design principles:
//! 1. Use u32 indices into the arena (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most nodes have few children)
//! 3. Keep the node struct flat - no nested ownership, no back-pointers

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any rendered document
pub type NodeId = u32;

/// Attribute carrying the logical location identifier of an editable element.
///
/// The document translator stamps this onto every text-owning element whose
/// edits should be tracked. The value is treated as an opaque, stable string
/// key - this crate never assigns or interprets it.
pub const PATH_ATTRIBUTE: &str = "data-odr-path";

/// Node type matching DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }

    /// Character-data node types carry their text in `node_value`.
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeType::Text | NodeType::CdataSection | NodeType::Comment
        )
    }
}

/// A single node in the rendered-document tree.
///
/// Design:
/// - Small fixed-size fields first (better packing)
/// - Indices instead of pointers; the arena owns everything
/// - `node_value` holds character data for text-like nodes, empty otherwise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    // Content
    pub node_name: String,
    pub node_value: String,
    pub attributes: HashMap<String, String>,
}

impl DomNode {
    /// Create a new node with required fields
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Logical location identifier of this element, if it carries one.
    ///
    /// Returns `None` for elements without the attribute and for attribute
    /// values that are empty or whitespace-only - those elements do not
    /// participate in edit tracking.
    pub fn path(&self) -> Option<&str> {
        let value = self.attr(PATH_ATTRIBUTE)?;
        if crate::utils::is_trackable_path(value) {
            Some(value)
        } else {
            None
        }
    }
}
