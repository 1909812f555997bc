//! Stable error codes for input diagnostics.
//!
//! Codes serialize as `snake_case` strings and never change once published,
//! so callers can match on them instead of parsing messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable classification of an input validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Doc-topic columns disagree with topic-term rows.
    TopicCountMismatch,
    /// Doc-length count disagrees with doc-topic rows.
    DocCountMismatch,
    /// Vocabulary length disagrees with topic-term columns.
    VocabSizeMismatch,
    /// Term-frequency length disagrees with the vocabulary.
    TermFrequencyLengthMismatch,
    /// A topic-term row does not sum to 1.
    TopicTermNotNormalized,
    /// A doc-topic row does not sum to 1.
    DocTopicNotNormalized,
    /// Rows of one matrix have different lengths.
    RaggedRows,
    /// No topics, terms or documents.
    EmptyModel,
}

impl ErrorCode {
    /// Returns the string used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopicCountMismatch => "topic_count_mismatch",
            Self::DocCountMismatch => "doc_count_mismatch",
            Self::VocabSizeMismatch => "vocab_size_mismatch",
            Self::TermFrequencyLengthMismatch => "term_frequency_length_mismatch",
            Self::TopicTermNotNormalized => "topic_term_not_normalized",
            Self::DocTopicNotNormalized => "doc_topic_not_normalized",
            Self::RaggedRows => "ragged_rows",
            Self::EmptyModel => "empty_model",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
