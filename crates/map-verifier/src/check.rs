//! Check recording.

use serde::Serialize;

/// The outcome of one assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub success: bool,
    pub message: String,
}

/// Receives failed checks as soon as they are recorded.
pub trait Reporter: Send + Sync {
    /// Called once per failed check of the run labelled `kind`.
    fn failed(&self, kind: &str, check: &CheckResult);
}

/// A reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn failed(&self, _kind: &str, _check: &CheckResult) {}
}

/// Collects the checks of one run and forwards failures to a [`Reporter`].
pub struct CheckRecorder<'a> {
    kind: &'a str,
    reporter: &'a dyn Reporter,
    checks: Vec<CheckResult>,
    failed: usize,
}

impl<'a> CheckRecorder<'a> {
    pub fn new(kind: &'a str, reporter: &'a dyn Reporter) -> Self {
        Self {
            kind,
            reporter,
            checks: Vec::new(),
            failed: 0,
        }
    }

    /// Records a check. Failures are reported immediately.
    pub fn record(&mut self, success: bool, message: impl Into<String>) {
        let check = CheckResult {
            success,
            message: message.into(),
        };
        if !success {
            self.failed += 1;
            self.reporter.failed(self.kind, &check);
        }
        self.checks.push(check);
    }

    #[inline]
    pub fn failed(&self) -> usize {
        self.failed
    }

    #[inline]
    pub fn passed(&self) -> usize {
        self.checks.len() - self.failed
    }

    pub fn into_checks(self) -> Vec<CheckResult> {
        self.checks
    }
}
