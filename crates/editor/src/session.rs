//! Editor Session - owns one document's edit tracking end to end
//!
//! This is the high-level API a host page drives. One session per edited
//! document; sessions share nothing, so several can live in one process.
//!
//! Record flow:
//!
//! ```text
//! edit op → Document emits batch → mpsc channel → drain → MutationObserver
//!                                                              ↓
//!                                                         ChangeTable
//!                                                              ↓
//!                                              generate_diff (pure read)
//! ```
//!
//! Batches are drained run-to-completion at the end of every mutating
//! operation, before control returns to the caller - the same turn
//! boundary at which a browser delivers coalesced mutation callbacks. The
//! observer is the only writer to the change table; diff generation only
//! ever reads.

use std::path::PathBuf;
use std::sync::Arc;

use dom::{Batch, Document, NodeId};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex, RwLock};
use uuid::Uuid;

use crate::error::{EditorError, Result};
use crate::events::{EditorEvent, EventBus};
use crate::export::{DiffExporter, ExportConfig};
use crate::guard::{Disposition, Guard, GuardSet, Key, KeyEvent};
use crate::guards::NewlineGuard;
use crate::journal::{ChangeTable, DiffPayload};
use crate::observer::{MutationObserver, ObserverConfig};
use crate::report::{ErrorReporter, TracingReporter};

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub id: String,
    pub observer: ObserverConfig,
    pub export: ExportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            observer: ObserverConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// What became of one keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default behavior proceeds
    PassThrough,
    /// A guard vetoed the key; the violation went through the reporter
    Suppressed,
    /// The export combination fired; here is the payload
    Export(String),
}

/// Editor Session - document, observer, guards and diff generation
pub struct EditorSession {
    pub config: SessionConfig,
    pub event_bus: EventBus,

    document: Arc<RwLock<Document>>,
    table: Arc<RwLock<ChangeTable>>,
    observer: MutationObserver,
    guards: GuardSet,
    reporter: Arc<dyn ErrorReporter>,

    // Record delivery: senders may multiply, the drain is the one consumer
    batch_tx: mpsc::UnboundedSender<Batch>,
    batch_rx: Mutex<mpsc::UnboundedReceiver<Batch>>,
}

impl EditorSession {
    /// Attach to a document with default config and the logging reporter
    pub fn attach(document: Document) -> Self {
        Self::attach_with(document, SessionConfig::default(), Arc::new(TracingReporter))
    }

    /// Attach to a document.
    ///
    /// The change table starts empty and observation begins immediately;
    /// there is no stop operation - observation lasts as long as the
    /// session.
    pub fn attach_with(
        document: Document,
        config: SessionConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let table = Arc::new(RwLock::new(ChangeTable::new()));
        let observer = MutationObserver::new(config.observer.clone(), Arc::clone(&table));
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();

        let mut guards = GuardSet::new();
        guards.register(Box::new(NewlineGuard::new()));

        let event_bus = EventBus::new();
        tracing::info!(session_id = %config.id, "editor session attached");
        event_bus.publish(EditorEvent::Attached {
            session_id: config.id.clone(),
        });

        Self {
            config,
            event_bus,
            document: Arc::new(RwLock::new(document)),
            table,
            observer,
            guards,
            reporter,
            batch_tx,
            batch_rx: Mutex::new(batch_rx),
        }
    }

    /// Add a guard on top of the built-in set
    pub fn register_guard(&mut self, guard: Box<dyn Guard>) {
        self.guards.register(guard);
    }

    /// Shared handle to the live document
    pub fn document(&self) -> Arc<RwLock<Document>> {
        Arc::clone(&self.document)
    }

    // --- document construction passthroughs ---

    pub async fn create_element(&self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.document.write().await.create_element(tag, attributes)
    }

    pub async fn create_text(&self, text: &str) -> NodeId {
        self.document.write().await.create_text(text)
    }

    /// Find the element carrying a logical location identifier
    pub async fn find_by_path(&self, path: &str) -> Option<NodeId> {
        self.document.read().await.arena().find_by_path(path)
    }

    // --- edit operations (observed) ---

    /// Replace the character data of a text node
    pub async fn edit_text(&self, target: NodeId, text: &str) -> Result<()> {
        let batch = self.document.write().await.set_character_data(target, text)?;
        self.deliver(batch).await
    }

    /// Append a child under a parent
    pub async fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let batch = self.document.write().await.append_child(parent, child)?;
        self.deliver(batch).await
    }

    /// Remove a node; its subtree stays readable for diff generation
    pub async fn remove_node(&self, target: NodeId) -> Result<()> {
        let batch = self.document.write().await.remove_node(target)?;
        self.deliver(batch).await
    }

    /// Send a batch into the channel, then drain everything pending.
    ///
    /// Draining before returning keeps the turn semantics: by the time a
    /// caller regains control, every record its edit produced has been
    /// applied to the change table.
    async fn deliver(&self, batch: Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.batch_tx
            .send(batch)
            .map_err(|_| EditorError::ChannelClosed)?;
        self.drain().await
    }

    /// Apply all queued batches in arrival order, to completion
    async fn drain(&self) -> Result<()> {
        let mut rx = self.batch_rx.lock().await;
        let document = self.document.read().await;

        while let Ok(batch) = rx.try_recv() {
            let stats = self.observer.process_batch(&document, &batch).await;
            self.event_bus.publish(EditorEvent::BatchApplied {
                tracked: stats.tracked,
                ignored: stats.ignored,
            });
        }
        Ok(())
    }

    // --- diff generation ---

    /// Serialize the current state of every tracked location.
    ///
    /// Pure read: repeated calls with no intervening edits produce
    /// identical payloads. Safe to call from a synchronous key handler.
    pub async fn generate_diff(&self) -> Result<String> {
        let document = self.document.read().await;
        let table = self.table.read().await;
        let payload = DiffPayload::capture(&table, &document)?;
        payload.to_json()
    }

    /// Generate the diff and write it to the configured export target
    pub async fn export_diff(&self) -> Result<PathBuf> {
        let payload = self.generate_diff().await?;
        let exporter = DiffExporter::new(self.config.export.clone());
        let path = exporter.export(&payload)?;
        self.event_bus.publish(EditorEvent::DiffExported {
            path: path.display().to_string(),
        });
        Ok(path)
    }

    // --- keystroke handling ---

    /// Run one keystroke through the guards, then the export shortcut.
    ///
    /// A suppressed key produces exactly one report through the error
    /// channel; editing continues afterwards.
    pub async fn handle_key(&self, event: KeyEvent) -> Result<KeyOutcome> {
        if let Disposition::Suppress(error) = self.guards.inspect(&event) {
            self.reporter.report(error.code, error.message);
            self.event_bus
                .publish(EditorEvent::EditRejected { code: error.code });
            return Ok(KeyOutcome::Suppressed);
        }

        let save_combo = (event.ctrl || event.meta)
            && matches!(event.key, Key::Char(c) if c.eq_ignore_ascii_case(&'s'));
        if save_combo {
            let payload = self.generate_diff().await?;
            return Ok(KeyOutcome::Export(payload));
        }

        Ok(KeyOutcome::PassThrough)
    }
}
