//! Event Bus - simple event system for editor lifecycle events
//!
//! Design: type-safe events with broadcast delivery.
//! No dynamic dispatch overhead - use enums, not trait objects.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Editor events that can be dispatched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Observation over a document began
    Attached { session_id: String },
    /// One record batch was applied to the change table
    BatchApplied { tracked: usize, ignored: usize },
    /// A keystroke was rejected by a guard
    EditRejected { code: u32 },
    /// A diff payload was written to disk
    DiffExported { path: String },
}

/// Simple event bus using tokio broadcast channel
pub struct EventBus {
    tx: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Publish an event
    pub fn publish(&self, event: EditorEvent) {
        let _ = self.tx.send(event); // Ignore error if no subscribers
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
