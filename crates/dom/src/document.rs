//! Document - main entry point for document operations
//!
//! This handles:
//! - Snapshot ingestion (parsing a serialized document tree into the arena)
//! - Builder operations for constructing a tree programmatically
//! - Mutation operations that emit ordered record batches
//! - Rendered-text extraction for any element, attached or not

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::records::{Batch, MutationRecord};
use crate::serializer::TextSerializer;
use crate::types::{NodeId, NodeType};
use serde_json::Value;
use std::path::Path;

/// A live rendered document: the arena plus the operations a host page
/// performs on it. Every mutating operation returns the batch of records
/// describing what changed, in the order it changed - the delivery
/// mechanism and any tracking built on top live with the caller.
#[derive(Debug)]
pub struct Document {
    arena: DomArena,
    root: NodeId,
}

impl Document {
    /// Create an empty document with a `#document` root
    pub fn new() -> Self {
        let (arena, root) = DomArena::with_root(NodeType::Document, "#document");
        Self { arena, root }
    }

    /// Parse a serialized document snapshot.
    ///
    /// Input format is the familiar tree shape:
    /// ```json
    /// {
    ///   "nodeType": 9,
    ///   "nodeName": "#document",
    ///   "children": [{
    ///     "nodeType": 1,
    ///     "nodeName": "p",
    ///     "attributes": { "data-odr-path": "1/0" },
    ///     "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "Hello" }]
    ///   }]
    /// }
    /// ```
    pub fn from_json(snapshot: &Value) -> Result<Self> {
        let mut arena = DomArena::new();
        let root_id = Self::parse_node(&mut arena, snapshot, None)?;
        arena.set_root(root_id)?;
        Ok(Self {
            arena,
            root: root_id,
        })
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json_str(snapshot: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(snapshot)?;
        Self::from_json(&value)
    }

    /// Parse a snapshot from a file on disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Recursively parse a snapshot node
    fn parse_node(arena: &mut DomArena, value: &Value, parent_id: Option<NodeId>) -> Result<NodeId> {
        let node_type_val = value["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::MalformedSnapshot("missing nodeType".to_string()))?
            as u8;

        let node_type = NodeType::from_u8(node_type_val).ok_or_else(|| DomError::InvalidNodeType {
            expected: "valid NodeType".to_string(),
            actual: format!("{}", node_type_val),
        })?;

        let node_name = value["nodeName"].as_str().unwrap_or("").to_string();
        if node_name.is_empty() {
            return Err(DomError::MalformedSnapshot(
                "missing nodeName".to_string(),
            ));
        }

        let node_id = arena.alloc(node_type, node_name);
        {
            let node = arena.get_mut(node_id)?;
            node.parent_id = parent_id;
            node.node_value = value["nodeValue"].as_str().unwrap_or("").to_string();

            if let Some(attrs) = value["attributes"].as_object() {
                for (key, attr_value) in attrs {
                    let attr_value = attr_value.as_str().ok_or_else(|| {
                        DomError::MalformedSnapshot(format!("attribute {} is not a string", key))
                    })?;
                    node.attributes.insert(key.clone(), attr_value.to_string());
                }
            }
        }

        if let Some(children) = value["children"].as_array() {
            let mut child_ids = smallvec::SmallVec::new();
            for child in children {
                let child_id = Self::parse_node(arena, child, Some(node_id))?;
                child_ids.push(child_id);
            }
            arena.get_mut(node_id)?.children_ids = child_ids;
        }

        Ok(node_id)
    }

    /// Read access to the underlying arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Root node ID
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    // --- builder operations (no records: construction, not editing) ---

    /// Create a detached element with the given attributes
    pub fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.arena.alloc(NodeType::Element, tag);
        if let Ok(node) = self.arena.get_mut(id) {
            for (key, value) in attributes {
                node.attributes
                    .insert((*key).to_string(), (*value).to_string());
            }
        }
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.arena.alloc(NodeType::Text, "#text");
        if let Ok(node) = self.arena.get_mut(id) {
            node.node_value = text.to_string();
        }
        id
    }

    // --- mutation operations (return record batches) ---

    /// Replace the character data of a text-like node
    pub fn set_character_data(&mut self, target: NodeId, text: &str) -> Result<Batch> {
        let node = self.arena.get_mut(target)?;
        if !node.node_type.is_character_data() {
            return Err(DomError::InvalidNodeType {
                expected: "character-data node".to_string(),
                actual: format!("{:?}", node.node_type),
            });
        }
        node.node_value = text.to_string();
        Ok(vec![MutationRecord::character_data(target)])
    }

    /// Append a child under a parent, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<Batch> {
        let previous_parent = self.arena.get(child)?.parent_id;

        self.arena.append_child(parent, child)?;

        let mut batch = Vec::with_capacity(2);
        if let Some(old_parent) = previous_parent {
            batch.push(MutationRecord::child_removed(old_parent, child));
        }
        batch.push(MutationRecord::child_added(parent, child));
        Ok(batch)
    }

    /// Remove a node from its parent. The subtree stays in the arena and
    /// keeps its last-known content.
    pub fn remove_node(&mut self, target: NodeId) -> Result<Batch> {
        let parent = self
            .arena
            .get(target)?
            .parent_id
            .ok_or(DomError::DetachedNode(target))?;

        self.arena.unlink(target)?;
        Ok(vec![MutationRecord::child_removed(parent, target)])
    }

    // --- queries ---

    /// Whether a node still chains up to the document root
    pub fn is_attached(&self, node_id: NodeId) -> bool {
        self.arena.is_attached(node_id)
    }

    /// Current rendered (visible) text of a node's subtree.
    ///
    /// Works for detached nodes too - the arena retains their last-known
    /// content.
    pub fn rendered_text(&self, node_id: NodeId) -> Result<String> {
        TextSerializer::new().rendered_text(&self.arena, node_id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MutationKind;
    use crate::types::PATH_ATTRIBUTE;

    fn sample_document() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root_id();
        let para = doc.create_element("p", &[(PATH_ATTRIBUTE, "p1")]);
        let text = doc.create_text("Hello");
        doc.append_child(root, para).unwrap();
        doc.append_child(para, text).unwrap();
        (doc, para, text)
    }

    #[test]
    fn test_set_character_data_emits_record() {
        let (mut doc, _para, text) = sample_document();

        let batch = doc.set_character_data(text, "Hello world").unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, MutationKind::CharacterData);
        assert_eq!(batch[0].target, text);
        assert_eq!(doc.arena().get(text).unwrap().node_value, "Hello world");
    }

    #[test]
    fn test_set_character_data_rejects_elements() {
        let (mut doc, para, _text) = sample_document();
        assert!(matches!(
            doc.set_character_data(para, "nope"),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_remove_node_detaches_but_preserves_text() {
        let (mut doc, para, _text) = sample_document();

        let batch = doc.remove_node(para).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, MutationKind::ChildList);
        assert_eq!(batch[0].removed.as_slice(), &[para]);

        assert!(!doc.is_attached(para));
        assert_eq!(doc.rendered_text(para).unwrap(), "Hello");
    }

    #[test]
    fn test_remove_detached_node_errors() {
        let (mut doc, para, _text) = sample_document();
        doc.remove_node(para).unwrap();
        assert!(matches!(
            doc.remove_node(para),
            Err(DomError::DetachedNode(_))
        ));
    }

    #[test]
    fn test_reparent_emits_removal_then_insertion() {
        let (mut doc, para, text) = sample_document();
        let root = doc.root_id();
        let other = doc.create_element("div", &[]);
        doc.append_child(root, other).unwrap();

        let batch = doc.append_child(other, text).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].removed.as_slice(), &[text]);
        assert_eq!(batch[0].target, para);
        assert_eq!(batch[1].added.as_slice(), &[text]);
        assert_eq!(batch[1].target, other);
    }

    #[test]
    fn test_from_json() {
        let snapshot = serde_json::json!({
            "nodeType": 9,
            "nodeName": "#document",
            "children": [{
                "nodeType": 1,
                "nodeName": "body",
                "children": [{
                    "nodeType": 1,
                    "nodeName": "p",
                    "attributes": { PATH_ATTRIBUTE: "1/0" },
                    "children": [{
                        "nodeType": 3,
                        "nodeName": "#text",
                        "nodeValue": "Lorem ipsum"
                    }]
                }]
            }]
        });

        let doc = Document::from_json(&snapshot).unwrap();
        assert_eq!(doc.arena().len(), 4);

        let para = doc.arena().find_by_path("1/0").unwrap();
        assert_eq!(doc.rendered_text(para).unwrap(), "Lorem ipsum");
        assert!(doc.is_attached(para));
    }

    #[test]
    fn test_from_json_rejects_bad_node_type() {
        let snapshot = serde_json::json!({ "nodeType": 42, "nodeName": "#document" });
        assert!(matches!(
            Document::from_json(&snapshot),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        let snapshot = serde_json::json!({ "nodeName": "#document" });
        assert!(matches!(
            Document::from_json(&snapshot),
            Err(DomError::MalformedSnapshot(_))
        ));
    }
}
