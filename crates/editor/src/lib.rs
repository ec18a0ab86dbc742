//! Edit Tracking Core for Rendered Documents
//!
//! This crate instruments a rendered document (see the `dom` crate) with
//! change tracking and diff export:
//!
//! 1. **Mutation observer**: record batches from document edits are drained
//!    in order and attributed to stable logical locations via the
//!    `data-odr-path` attribute on the owning element.
//! 2. **Change table**: a latest-writer-wins map from logical location to
//!    the element that owns the edited text - live handles, never copies.
//! 3. **Diff generator**: serializes the current text of every tracked
//!    location as `{"modifiedText":{...}}`, keys in first-write order.
//! 4. **Input guard**: vetoes disallowed keystrokes (line breaks) and
//!    routes violations through a host-replaceable error reporter.
//!
//! Everything hangs off an [`EditorSession`]; sessions share no state, so
//! one process can edit any number of documents independently.

pub mod error;
pub mod events;
pub mod export;
pub mod guard;
pub mod guards;
pub mod journal;
pub mod observer;
pub mod report;
pub mod session;

pub use error::{EditorError, Result};
pub use events::{EditorEvent, EventBus};
pub use export::{DiffExporter, ExportConfig};
pub use guard::{Disposition, Guard, GuardSet, Key, KeyEvent};
pub use guards::NewlineGuard;
pub use journal::{ChangeTable, DiffPayload, TrackedEntry};
pub use observer::{BatchStats, MutationObserver, ObserverConfig};
pub use report::{CollectingReporter, EditError, ErrorReporter, TracingReporter, ILLEGAL_EDIT_NEW_LINE};
pub use session::{EditorSession, KeyOutcome, SessionConfig};
