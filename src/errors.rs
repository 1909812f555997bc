//! Error types for rapid_ldavis
//!
//! This module defines the error types returned by [`crate::prepare`].
//! Shape problems are reported all at once through a
//! [`ValidationReport`]; numerical problems name the topic or term that
//! made the computation undefined.

use thiserror::Error;

use crate::pipeline::validation::ValidationReport;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PrepareError>;

/// Main error type for rapid_ldavis
#[derive(Error, Debug, Clone)]
pub enum PrepareError {
    /// The five model inputs are inconsistent or not normalized.
    ///
    /// The message lists every violation, one per line.
    #[error("Invalid model input:{}", report.bulleted())]
    Validation { report: ValidationReport },

    /// An ordination selector was not recognized.
    /// Note: `prepare` recovers from this by falling back to PCoA
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A parameter is outside its legal range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The model input is degenerate (log of zero, division by zero)
    #[error("Numerical error: {message}")]
    Numerical { message: String },

    /// An ordination strategy produced unusable coordinates
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Reading or writing a file failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Internal error (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PrepareError {
    /// Create a validation error from a report with at least one error
    pub fn validation(report: ValidationReport) -> Self {
        Self::Validation { report }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    /// Create a projection error
    pub fn projection(message: impl Into<String>) -> Self {
        Self::Projection {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error came from input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error indicates degenerate numerical input
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Numerical { .. })
    }

    /// The validation report, when this is a validation error
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation { report } => Some(report),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PrepareError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error_code::ErrorCode;
    use crate::pipeline::validation::ValidationDiagnostic;
    use crate::pipeline::errors::InputError;

    #[test]
    fn test_error_display() {
        let err = PrepareError::numerical("log(0) for topic 2, term 'car'");
        assert!(err.to_string().contains("Numerical error"));
        assert!(err.to_string().contains("'car'"));

        let err = PrepareError::invalid_config("lambda_step must be in (0, 1]");
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_validation_display_lists_every_violation() {
        let mut report = ValidationReport::default();
        report.diagnostics.push(ValidationDiagnostic::error(InputError::new(
            ErrorCode::TopicCountMismatch,
            "/doc_topic_dists",
            "first problem",
        )));
        report.diagnostics.push(ValidationDiagnostic::error(InputError::new(
            ErrorCode::VocabSizeMismatch,
            "/vocab",
            "second problem",
        )));

        let err = PrepareError::validation(report);
        assert_eq!(
            err.to_string(),
            "Invalid model input:\n * first problem\n * second problem"
        );
        assert!(err.is_validation());
        assert_eq!(err.report().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: PrepareError = parse.unwrap_err().into();
        assert!(matches!(err, PrepareError::Serialization { .. }));
    }
}
