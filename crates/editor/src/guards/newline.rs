//! Newline Guard - rejects multi-line text entry
//!
//! The edited document format has no representation for a user-inserted
//! line break, so the line-break key is suppressed outright. Modifier keys
//! make no difference: Enter is Enter.

use crate::guard::{Disposition, Guard, Key, KeyEvent};
use crate::report::ILLEGAL_EDIT_NEW_LINE;

/// Suppresses the line-break key and flags the violation
#[derive(Debug, Default)]
pub struct NewlineGuard;

impl NewlineGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Guard for NewlineGuard {
    fn name(&self) -> &str {
        "NewlineGuard"
    }

    fn inspect(&self, event: &KeyEvent) -> Disposition {
        if event.key == Key::Enter {
            Disposition::Suppress(ILLEGAL_EDIT_NEW_LINE)
        } else {
            Disposition::PassThrough
        }
    }
}
