//! Input diagnostic type produced by validation rules.
//!
//! An [`InputError`] carries a stable [`ErrorCode`] for programmatic
//! matching, a JSON pointer `path` naming the offending input, a
//! human-readable `message`, and an optional `hint` suggesting a fix.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error_code::ErrorCode;

/// A problem found in the five model inputs before any computation runs.
///
/// # Display format
///
/// ```text
/// [vocab_size_mismatch] /vocab: Number of terms in vocabulary does not match ...
/// ```
///
/// # JSON format
///
/// ```json
/// {
///   "code": "vocab_size_mismatch",
///   "path": "/vocab",
///   "message": "Number of terms in vocabulary does not match ...",
///   "hint": "Pass the vocabulary the model was trained with"
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] {path}: {message}")]
pub struct InputError {
    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// JSON pointer naming the problematic input.
    ///
    /// Examples: `"/topic_term_dists"`, `"/doc_lengths"`.
    pub path: String,

    /// Human-readable description of the problem.
    pub message: String,

    /// Optional suggestion for how to fix the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl InputError {
    /// Create a new input error.
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a hint suggesting how to fix the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
