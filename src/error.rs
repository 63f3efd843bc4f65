//! Error types for the media-files-manager library.
//!
//! [`MfmError`] is the single typed error of the crate. How it reaches the
//! caller depends on the layer:
//!
//! * **Parsers** ([`crate::parse`]) return `Err(MfmError::InvalidInput)` for
//!   malformed page or time expressions.
//!
//! * **Sandbox operations** ([`crate::fs::Sandbox`]) never return an error for
//!   expected conditions. Restriction violations, missing files and I/O
//!   failures are folded into an [`crate::output::OperationResult`] (or a
//!   `bool` for directory creation) so batch callers keep going past a bad
//!   entry. The `try_*` variants expose the typed reason.

use std::path::PathBuf;
use thiserror::Error;

/// Fixed error text for a path outside the sandbox root.
pub const RESTRICTION_MESSAGE: &str = "Restrictions";

/// Fixed error text for a removal target that is missing or not a file.
pub const NOT_A_FILE_MESSAGE: &str = "Object is not a file or doesn't exist";

/// All errors produced by the media-files-manager library.
#[derive(Debug, Error)]
pub enum MfmError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// A page or time expression could not be parsed.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    // ── Sandbox errors ────────────────────────────────────────────────────
    /// The operation would touch a path outside the permitted root.
    #[error("Restrictions: '{path}' is outside '{root}'")]
    RestrictionViolation { path: PathBuf, root: PathBuf },

    /// Target does not exist or is of the wrong kind.
    #[error("Object is not a file or doesn't exist: '{path}'")]
    NotFound { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// An underlying filesystem call failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An activity-log entry could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking worker panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MfmError {
    pub(crate) fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        MfmError::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MfmError::Io {
            path: path.into(),
            source,
        }
    }

    /// The text stored in [`crate::output::OperationResult::error`] for this error.
    ///
    /// Restriction and not-found failures use their fixed short labels; I/O
    /// failures carry the underlying OS message.
    pub fn result_text(&self) -> String {
        match self {
            MfmError::RestrictionViolation { .. } => RESTRICTION_MESSAGE.to_string(),
            MfmError::NotFound { .. } => NOT_A_FILE_MESSAGE.to_string(),
            MfmError::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}
