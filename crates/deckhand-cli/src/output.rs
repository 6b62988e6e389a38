//! Output rendering for the CLI
//!
//! Human output prints checkmarked summary lines, indented detail, and
//! per-file commit rows. JSON output reserves stdout for machine-readable
//! documents (deploy reports, config dumps) and keeps diagnostics on
//! stderr, so piped callers never have to strip prose.

use deckhand_core::domain::commit::CommitResult;

/// Output format selector, from the global `--json` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Renders command results in the selected format
pub trait Reporter {
    /// Summary line for a command that worked
    fn done(&self, message: &str);
    /// Summary line for a command that failed
    fn fail(&self, message: &str);
    /// Non-fatal caution, always on stderr
    fn caution(&self, message: &str);
    /// Indented detail line under the current summary
    fn detail(&self, message: &str);
    /// One per-file row of a commit batch
    fn commit_row(&self, result: &CommitResult);
    /// Machine-readable document on stdout
    fn payload(&self, value: &serde_json::Value);
}

/// Builds the text of one per-file commit row.
///
/// Successes show the new version id (or `deleted` when the write removed
/// the file); failures show the recorded reason.
fn commit_row_text(result: &CommitResult) -> String {
    if result.success {
        match &result.new_version_id {
            Some(id) => format!("\u{2713} {} ({})", result.path, id),
            None => format!("\u{2713} {} (deleted)", result.path),
        }
    } else {
        format!(
            "\u{2717} {}: {}",
            result.path,
            result.error.as_deref().unwrap_or("unknown failure")
        )
    }
}

/// Prose renderer for interactive use
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn done(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn fail(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn caution(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn detail(&self, message: &str) {
        println!("  {}", message);
    }
    fn commit_row(&self, result: &CommitResult) {
        println!("  {}", commit_row_text(result));
    }
    fn payload(&self, _value: &serde_json::Value) {
        // Human mode renders prose, not documents.
    }
}

/// Machine-readable renderer for `--json`
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn done(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn fail(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn caution(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn detail(&self, _message: &str) {}
    fn commit_row(&self, _result: &CommitResult) {
        // Rows travel inside the report payload.
    }
    fn payload(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn reporter_for(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Json => Box::new(JsonReporter),
        OutputFormat::Human => Box::new(TerminalReporter),
    }
}
