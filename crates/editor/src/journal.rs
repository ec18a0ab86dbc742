//! Change table and diff generation
//!
//! The change table is a latest-writer-wins map from logical location
//! identifier to the element that currently owns the edited text. Values
//! are arena handles, never text copies: text extraction is deferred until
//! a diff is actually requested, so the payload always reflects the most
//! current state even when many mutations land between diff requests.
//!
//! ## Data Layout
//!
//! ```text
//! entries: Vec<TrackedEntry>      - first-write order, never reordered
//! index:   AHashMap<path, slot>   - O(1) upsert into entries
//! ```
//!
//! Entries are never removed, even when the element they reference has
//! been detached from the document - the diff reads its last-known text.

use crate::error::Result;
use ahash::AHashMap;
use dom::{Document, NodeId};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// One tracked logical location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    /// Logical location identifier (the element's `data-odr-path` value)
    pub path: String,
    /// The element whose text most recently changed under that path
    pub element: NodeId,
}

/// Latest-writer-wins map of modified locations
#[derive(Debug, Default)]
pub struct ChangeTable {
    entries: Vec<TrackedEntry>,
    index: AHashMap<String, usize>,
}

impl ChangeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Record that `element` now owns the text at `path`.
    ///
    /// A path seen before keeps its original position and gets its element
    /// handle overwritten; a new path is appended. The table is a map, not
    /// a log.
    pub fn upsert(&mut self, path: &str, element: NodeId) {
        if let Some(&slot) = self.index.get(path) {
            self.entries[slot].element = element;
        } else {
            self.index.insert(path.to_string(), self.entries.len());
            self.entries.push(TrackedEntry {
                path: path.to_string(),
                element,
            });
        }
    }

    /// Element currently tracked for a path
    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.index.get(path).map(|&slot| self.entries[slot].element)
    }

    /// Entries in first-write order
    pub fn iter(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.entries.iter()
    }

    /// Number of tracked paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been tracked yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A point-in-time snapshot of every tracked location's current text.
///
/// Produced fresh on every capture; never cached. Serializes as
/// `{"modifiedText":{"<path>":"<text>",...}}` with keys in first-write
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPayload {
    entries: Vec<(String, String)>,
}

impl DiffPayload {
    /// Read the current rendered text of every tracked element.
    ///
    /// Pure read: mutates neither the table nor the document. Detached
    /// elements resolve to their last-known text (the arena retains
    /// removed subtrees) - a tracked element disappearing from the
    /// document must not fail the whole diff.
    pub fn capture(table: &ChangeTable, document: &Document) -> Result<Self> {
        let mut entries = Vec::with_capacity(table.len());

        for tracked in table.iter() {
            if !document.is_attached(tracked.element) {
                tracing::warn!(
                    path = %tracked.path,
                    element = tracked.element,
                    "tracked element is detached; reading last-known text"
                );
            }
            let text = document.rendered_text(tracked.element)?;
            entries.push((tracked.path.clone(), text));
        }

        Ok(Self { entries })
    }

    /// Tracked (path, text) pairs in first-write order
    pub fn modified_text(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for DiffPayload {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct ModifiedText<'a>(&'a [(String, String)]);

        impl Serialize for ModifiedText<'_> {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                // Hand-ordered map: key order must be first-write order,
                // not hash or alphabetical order
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (path, text) in self.0 {
                    map.serialize_entry(path, text)?;
                }
                map.end()
            }
        }

        let mut payload = serializer.serialize_struct("DiffPayload", 1)?;
        payload.serialize_field("modifiedText", &ModifiedText(&self.entries))?;
        payload.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::PATH_ATTRIBUTE;

    #[test]
    fn test_upsert_overwrites_without_reordering() {
        let mut table = ChangeTable::new();
        table.upsert("a", 1);
        table.upsert("b", 2);
        table.upsert("a", 3);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(3));

        let order: Vec<&str> = table.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_payload_shape() {
        let table = ChangeTable::new();
        let doc = Document::new();
        let payload = DiffPayload::capture(&table, &doc).unwrap();
        assert_eq!(payload.to_json().unwrap(), r#"{"modifiedText":{}}"#);
    }

    #[test]
    fn test_payload_keys_keep_first_write_order() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let mut ids = Vec::new();
        for path in ["z", "a", "m"] {
            let el = doc.create_element("span", &[(PATH_ATTRIBUTE, path)]);
            let text = doc.create_text(path);
            doc.append_child(root, el).unwrap();
            doc.append_child(el, text).unwrap();
            ids.push(el);
        }

        let mut table = ChangeTable::new();
        table.upsert("z", ids[0]);
        table.upsert("a", ids[1]);
        table.upsert("m", ids[2]);
        // overwrites must not move keys
        table.upsert("z", ids[0]);
        table.upsert("a", ids[1]);

        let payload = DiffPayload::capture(&table, &doc).unwrap();
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"modifiedText":{"z":"z","a":"a","m":"m"}}"#
        );
    }

    #[test]
    fn test_capture_reads_detached_text() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let el = doc.create_element("span", &[(PATH_ATTRIBUTE, "p1")]);
        let text = doc.create_text("kept");
        doc.append_child(root, el).unwrap();
        doc.append_child(el, text).unwrap();

        let mut table = ChangeTable::new();
        table.upsert("p1", el);

        doc.remove_node(el).unwrap();

        let payload = DiffPayload::capture(&table, &doc).unwrap();
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"modifiedText":{"p1":"kept"}}"#
        );
    }
}
