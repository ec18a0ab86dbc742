//! Mutation observer - attributes document changes to logical locations
//!
//! The observer consumes record batches in delivery order and maintains
//! the change table. Only character-data records matter to the table:
//! child-list observation exists so that subtree restructuring does not
//! break character-data delivery for nested text, and those records are
//! deliberately dropped here.
//!
//! A record whose owning element carries no usable `data-odr-path` is a
//! normal no-op, not a failure: not every editable text node participates
//! in diffing.

use crate::journal::ChangeTable;
use dom::{Document, MutationKind, MutationRecord, NodeId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Observation configuration.
///
/// The default mirrors the one configuration the editing core is attached
/// with: structural and character-data changes at every depth, attribute
/// changes not watched. The fields exist for completeness; only the
/// default combination is supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    pub attributes: bool,
    pub child_list: bool,
    pub subtree: bool,
    pub character_data: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            attributes: false,
            child_list: true,
            subtree: true,
            character_data: true,
        }
    }
}

/// Counters for one processed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Records that updated the change table
    pub tracked: usize,
    /// Records skipped (untracked element, or kind not of interest)
    pub ignored: usize,
}

/// Applies record batches to the change table.
///
/// Single consumer by design: batches arrive in order and are processed
/// to completion before the next one - the table never sees concurrent
/// writers.
pub struct MutationObserver {
    config: ObserverConfig,
    table: Arc<RwLock<ChangeTable>>,
}

impl MutationObserver {
    pub fn new(config: ObserverConfig, table: Arc<RwLock<ChangeTable>>) -> Self {
        Self { config, table }
    }

    /// Process one batch in delivery order.
    ///
    /// The only observable effect is table mutation; there are no error
    /// conditions.
    pub async fn process_batch(&self, document: &Document, batch: &[MutationRecord]) -> BatchStats {
        let mut stats = BatchStats::default();
        let mut table = self.table.write().await;

        for record in batch {
            match record.kind {
                MutationKind::CharacterData if self.config.character_data => {
                    match Self::owning_path(document, record.target) {
                        Some((path, owner)) => {
                            table.upsert(&path, owner);
                            stats.tracked += 1;
                        }
                        None => {
                            tracing::trace!(
                                target_node = record.target,
                                "character-data change outside tracked content"
                            );
                            stats.ignored += 1;
                        }
                    }
                }
                _ => {
                    // Not the signal of interest for the table
                    tracing::debug!(?record, "ignoring record");
                    stats.ignored += 1;
                }
            }
        }

        stats
    }

    /// Resolve the owning element of a changed node and its logical path.
    ///
    /// The owning element is the parent of the node whose character data
    /// changed. Returns `None` when the parent is missing or carries no
    /// usable path attribute.
    fn owning_path(document: &Document, target: NodeId) -> Option<(String, NodeId)> {
        let arena = document.arena();
        let node = arena.get(target).ok()?;
        let parent_id = node.parent_id?;
        let parent = arena.get(parent_id).ok()?;
        let path = parent.path()?;
        Some((path.to_string(), parent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Document, PATH_ATTRIBUTE};

    fn tracked_document() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root_id();
        let para = doc.create_element("p", &[(PATH_ATTRIBUTE, "p1")]);
        let text = doc.create_text("Hello");
        doc.append_child(root, para).unwrap();
        doc.append_child(para, text).unwrap();
        (doc, para, text)
    }

    #[tokio::test]
    async fn test_character_data_is_tracked() {
        let (mut doc, para, text) = tracked_document();
        let table = Arc::new(RwLock::new(ChangeTable::new()));
        let observer = MutationObserver::new(ObserverConfig::default(), table.clone());

        let batch = doc.set_character_data(text, "Hello world").unwrap();
        let stats = observer.process_batch(&doc, &batch).await;

        assert_eq!(stats.tracked, 1);
        assert_eq!(stats.ignored, 0);
        assert_eq!(table.read().await.get("p1"), Some(para));
    }

    #[tokio::test]
    async fn test_untracked_element_is_skipped() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let span = doc.create_element("span", &[]); // no path attribute
        let text = doc.create_text("plain");
        doc.append_child(root, span).unwrap();
        doc.append_child(span, text).unwrap();

        let table = Arc::new(RwLock::new(ChangeTable::new()));
        let observer = MutationObserver::new(ObserverConfig::default(), table.clone());

        let batch = doc.set_character_data(text, "still plain").unwrap();
        let stats = observer.process_batch(&doc, &batch).await;

        assert_eq!(stats.tracked, 0);
        assert_eq!(stats.ignored, 1);
        assert!(table.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_path_attribute_is_skipped() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let span = doc.create_element("span", &[(PATH_ATTRIBUTE, "")]);
        let text = doc.create_text("plain");
        doc.append_child(root, span).unwrap();
        doc.append_child(span, text).unwrap();

        let table = Arc::new(RwLock::new(ChangeTable::new()));
        let observer = MutationObserver::new(ObserverConfig::default(), table.clone());

        let batch = doc.set_character_data(text, "edited").unwrap();
        observer.process_batch(&doc, &batch).await;

        assert!(table.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_child_list_records_are_ignored() {
        let (mut doc, para, _text) = tracked_document();
        let table = Arc::new(RwLock::new(ChangeTable::new()));
        let observer = MutationObserver::new(ObserverConfig::default(), table.clone());

        let extra = doc.create_text(" more");
        let batch = doc.append_child(para, extra).unwrap();
        let stats = observer.process_batch(&doc, &batch).await;

        assert_eq!(stats.tracked, 0);
        assert_eq!(stats.ignored, batch.len());
        assert!(table.read().await.is_empty());
    }

    #[test]
    fn test_character_data_disabled() {
        // sync driver for an async path
        tokio_test::block_on(async {
            let (mut doc, _para, text) = tracked_document();
            let table = Arc::new(RwLock::new(ChangeTable::new()));
            let config = ObserverConfig {
                character_data: false,
                ..ObserverConfig::default()
            };
            let observer = MutationObserver::new(config, table.clone());

            let batch = doc.set_character_data(text, "edited").unwrap();
            let stats = observer.process_batch(&doc, &batch).await;

            assert_eq!(stats.tracked, 0);
            assert!(table.read().await.is_empty());
        });
    }
}
