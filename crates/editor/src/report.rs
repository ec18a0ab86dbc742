//! Error-reporting interface
//!
//! A one-method capability the host can replace wholesale: violations of
//! editing policy are *reported*, never thrown. The default implementation
//! logs; a host page would surface a toast instead. Handlers are injected
//! at construction - there is no global binding to rebind.

use std::sync::Mutex;

/// A fixed, reportable policy violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditError {
    pub code: u32,
    pub message: &'static str,
}

/// The only violation defined today: the edited document cannot represent
/// a line break inserted by the user.
pub const ILLEGAL_EDIT_NEW_LINE: EditError = EditError {
    code: 1,
    message: "new line not supported by this document",
};

/// Error channel between the editing core and the host page.
///
/// `report` takes an error code and a human-readable message; it returns
/// nothing and must not panic on well-formed input.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, code: u32, message: &str);
}

/// Default reporter: logs at error level
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, code: u32, message: &str) {
        tracing::error!("error {} message {}", code, message);
    }
}

/// Test/diagnostic reporter that retains every report it receives
#[derive(Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<(u32, String)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(u32, String)> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, code: u32, message: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((code, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_error_shape() {
        assert_eq!(ILLEGAL_EDIT_NEW_LINE.code, 1);
        assert_eq!(
            ILLEGAL_EDIT_NEW_LINE.message,
            "new line not supported by this document"
        );
    }

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        reporter.report(1, "first");
        reporter.report(2, "second");

        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], (1, "first".to_string()));
        assert_eq!(reports[1], (2, "second".to_string()));
    }
}
