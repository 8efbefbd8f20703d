//! Output formatting.

use crate::cli::OutputFormat;
use map_verifier::{CheckResult, Reporter, VerifyReport};
use serde::Serialize;

/// Prints failed checks to stderr as they are found.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn failed(&self, kind: &str, check: &CheckResult) {
        eprintln!("{}", failure_line(kind, check));
    }
}

fn failure_line(kind: &str, check: &CheckResult) -> String {
    format!("❌ [{}] {}", kind, check.message)
}

/// Summary of a verification run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// One report per task, in launch order.
    pub tasks: Vec<VerifyReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.tasks.iter().map(|t| t.passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.tasks.iter().map(|t| t.failed).sum()
    }
}

/// Formats the run summary for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(summary),
            OutputFormat::Json => self.format_json(summary),
        }
    }

    fn format_human(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        for task in &summary.tasks {
            let total = task.passed + task.failed;
            let check_word = if total == 1 { "check" } else { "checks" };
            if task.failed == 0 {
                output.push_str(&format!(
                    "✅ [{}] {} {} passed\n",
                    task.kind, total, check_word
                ));
            } else {
                output.push_str(&format!(
                    "❌ [{}] {} of {} {} failed\n",
                    task.kind, task.failed, total, check_word
                ));
            }
        }

        let failed = summary.failed();
        let failure_word = if failed == 1 { "failure" } else { "failures" };
        let task_word = if summary.tasks.len() == 1 {
            "task"
        } else {
            "tasks"
        };
        output.push_str(&format!(
            "====================================\nverify-source-map found {} {} in {} {}",
            failed,
            failure_word,
            summary.tasks.len(),
            task_word
        ));

        output
    }

    fn format_json(&self, summary: &RunSummary) -> String {
        let value = serde_json::json!({
            "passed": summary.passed(),
            "failed": summary.failed(),
            "tasks": summary.tasks,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
