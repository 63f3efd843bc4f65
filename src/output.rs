//! The uniform result record returned by every file operation.
//!
//! Higher-level transformations (split a PDF, convert an image, extract a
//! clip, download a URL) all report through [`OperationResult`]. The
//! activity log and any UI read this shape, so its serialised field names
//! are part of the crate's contract.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `ctime`-style timestamp, e.g. `Thu Nov 20 12:34:56 2025`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Outcome of a single file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// File path or URL the operation acted on.
    pub subject: String,

    /// Free-text operation label, e.g. "Split PDF", "Remove".
    pub operation: String,

    pub success: bool,

    /// Human-readable message, set on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Error text, set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Where the produced file was written, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_location: Option<PathBuf>,

    /// Local time the record was created, in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,

    /// True when the operation went through an intermediate format
    /// conversion (e.g. an image re-encoded through PNG first).
    #[serde(default)]
    pub was_converted: bool,

    /// Sub-results of a composite operation, in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<OperationResult>,

    /// `(old, new)` file names produced by a bulk rename.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renamed: Vec<(String, String)>,
}

impl OperationResult {
    /// A successful result with a message.
    pub fn success(
        subject: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            operation: operation.into(),
            success: true,
            message: Some(message.into()),
            error: None,
            save_location: None,
            timestamp: now(),
            was_converted: false,
            steps: Vec::new(),
            renamed: Vec::new(),
        }
    }

    /// A failed result carrying error text.
    pub fn failure(
        subject: impl Into<String>,
        operation: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            operation: operation.into(),
            success: false,
            message: None,
            error: Some(error.into()),
            save_location: None,
            timestamp: now(),
            was_converted: false,
            steps: Vec::new(),
            renamed: Vec::new(),
        }
    }

    /// Convenience for path subjects.
    pub fn subject_path(path: &Path) -> String {
        path.display().to_string()
    }

    pub fn with_save_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.save_location = Some(location.into());
        self
    }

    pub fn with_conversion(mut self, converted: bool) -> Self {
        self.was_converted = converted;
        self
    }

    pub fn with_step(mut self, step: OperationResult) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_renamed(mut self, renamed: Vec<(String, String)>) -> Self {
        self.renamed = renamed;
        self
    }

    /// One-line summary for CLI or log output.
    pub fn summary(&self) -> String {
        match (&self.message, &self.error) {
            (_, Some(err)) if !self.success => {
                format!("{} {}: {}", self.operation, self.subject, err)
            }
            (Some(msg), _) => format!("{} {}: {}", self.operation, self.subject, msg),
            _ => format!("{} {}", self.operation, self.subject),
        }
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
