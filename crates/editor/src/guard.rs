//! Guard system - keystroke policy enforcement
//!
//! Guards inspect every keystroke dispatched to the document while editing
//! is active and decide whether the default behavior may proceed. They
//! never touch the change table: a suppressed key simply never produces a
//! mutation, and anything a guard misses still flows through the observer.

use crate::report::EditError;

/// A single keystroke as the host page delivers it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyEvent {
    /// A keystroke with no modifiers held
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
        }
    }

    pub fn with_ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn with_meta(key: Key) -> Self {
        Self {
            meta: true,
            ..Self::plain(key)
        }
    }
}

/// Keys the editing core distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Char(char),
}

/// A guard's verdict on one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Let the default behavior happen
    PassThrough,
    /// Prevent the default behavior and report the violation
    Suppress(EditError),
}

/// Guard trait - inspects keystrokes and vetoes disallowed edits
///
/// This is called for EVERY key event. The guard decides what to care
/// about; dispatch is cheap.
pub trait Guard: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Decide what happens to this keystroke
    fn inspect(&self, event: &KeyEvent) -> Disposition;
}

/// Guard registry - dispatches key events to all guards
#[derive(Default)]
pub struct GuardSet {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardSet {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard
    pub fn register(&mut self, guard: Box<dyn Guard>) {
        tracing::debug!("registered guard: {}", guard.name());
        self.guards.push(guard);
    }

    /// Dispatch a key event; the first suppression wins
    pub fn inspect(&self, event: &KeyEvent) -> Disposition {
        for guard in &self.guards {
            if let Disposition::Suppress(error) = guard.inspect(event) {
                tracing::debug!(guard = guard.name(), code = error.code, "key suppressed");
                return Disposition::Suppress(error);
            }
        }
        Disposition::PassThrough
    }

    /// Number of registered guards
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ILLEGAL_EDIT_NEW_LINE;

    struct RejectEverything;

    impl Guard for RejectEverything {
        fn name(&self) -> &str {
            "RejectEverything"
        }

        fn inspect(&self, _event: &KeyEvent) -> Disposition {
            Disposition::Suppress(ILLEGAL_EDIT_NEW_LINE)
        }
    }

    #[test]
    fn test_empty_guard_set_passes_through() {
        let guards = GuardSet::new();
        assert_eq!(
            guards.inspect(&KeyEvent::plain(Key::Enter)),
            Disposition::PassThrough
        );
    }

    #[test]
    fn test_first_suppression_wins() {
        let mut guards = GuardSet::new();
        guards.register(Box::new(RejectEverything));
        guards.register(Box::new(RejectEverything));

        match guards.inspect(&KeyEvent::plain(Key::Char('x'))) {
            Disposition::Suppress(error) => assert_eq!(error.code, 1),
            Disposition::PassThrough => panic!("expected suppression"),
        }
    }
}
