//! Validation engine for model inputs.
//!
//! The engine runs all registered [`ValidationRule`]s against a normalized
//! [`ModelData`] and collects every diagnostic into a [`ValidationReport`].
//! It never short-circuits on the first error, so users see all problems
//! at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_ldavis::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&data);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::InputError;
use super::input::{DistTable, ModelData};

/// Number of decimals a row sum is rounded to before comparing with 1.
pub const ROW_SUM_DECIMALS: i32 = 2;

/// Maximum number of offending row indices listed in a hint.
const MAX_LISTED_ROWS: usize = 5;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding: an error or warning attached to an
/// [`InputError`] that carries the code, path, message, and hint.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: InputError,
}

impl ValidationDiagnostic {
    pub fn error(err: InputError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: InputError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &InputError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &InputError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Total number of diagnostics (errors + warnings).
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether any error carries `code`.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.errors().any(|e| e.code == code)
    }

    /// Error messages, one per line, each prefixed with ` * `.
    ///
    /// Every line starts with a newline so the block can follow a heading.
    pub fn bulleted(&self) -> String {
        self.errors()
            .map(|e| format!("\n * {}", e.message))
            .collect()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects [`ModelData`] and returns zero or
/// more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so they can be shared
/// across threads (e.g., in a long-lived validation engine).
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"vocab_size"`).
    fn name(&self) -> &str;

    /// Inspect `data` and return any findings.
    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against [`ModelData`] and collects all
/// diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    ///
    /// The first six rules run in the order the LDAvis checks are
    /// documented; the structural rules follow.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(TopicCountRule));
        engine.add_rule(Box::new(DocCountRule));
        engine.add_rule(Box::new(VocabSizeRule));
        engine.add_rule(Box::new(TermFrequencyLengthRule));
        engine.add_rule(Box::new(NormalizedRowsRule::topic_term()));
        engine.add_rule(Box::new(NormalizedRowsRule::doc_topic()));
        engine.add_rule(Box::new(RaggedRowsRule));
        engine.add_rule(Box::new(EmptyModelRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in execution order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `data` and return the collected report.
    pub fn validate(&self, data: &ModelData) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(data));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Shorthand for a rule that yields a single error when `failed`.
fn single(failed: bool, err: impl FnOnce() -> InputError) -> Vec<ValidationDiagnostic> {
    if failed {
        vec![ValidationDiagnostic::error(err())]
    } else {
        vec![]
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── a. topic counts agree ──────────────────────────────────────────────────

struct TopicCountRule;

impl ValidationRule for TopicCountRule {
    fn name(&self) -> &str {
        "topic_count"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        single(
            data.doc_topic_dists.n_cols() != data.topic_term_dists.n_rows(),
            || {
                InputError::new(
                    ErrorCode::TopicCountMismatch,
                    "/doc_topic_dists",
                    "Number of rows of topic_term_dists does not match number of columns of \
                     doc_topic_dists; both should be equal to the number of topics in the model.",
                )
                .with_hint(format!(
                    "topic_term_dists has {} rows, doc_topic_dists has {} columns",
                    data.topic_term_dists.n_rows(),
                    data.doc_topic_dists.n_cols()
                ))
            },
        )
    }
}

// ─── b. document counts agree ───────────────────────────────────────────────

struct DocCountRule;

impl ValidationRule for DocCountRule {
    fn name(&self) -> &str {
        "doc_count"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        single(data.doc_lengths.len() != data.doc_topic_dists.n_rows(), || {
            InputError::new(
                ErrorCode::DocCountMismatch,
                "/doc_lengths",
                "Length of doc_lengths not equal to the number of rows in doc_topic_dists; \
                 both should be equal to the number of documents in the data.",
            )
            .with_hint(format!(
                "doc_lengths has {} entries, doc_topic_dists has {} rows",
                data.doc_lengths.len(),
                data.doc_topic_dists.n_rows()
            ))
        })
    }
}

// ─── c. vocabulary matches topic-term columns ───────────────────────────────

struct VocabSizeRule;

impl ValidationRule for VocabSizeRule {
    fn name(&self) -> &str {
        "vocab_size"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        single(data.topic_term_dists.n_cols() != data.vocab.len(), || {
            InputError::new(
                ErrorCode::VocabSizeMismatch,
                "/vocab",
                "Number of terms in vocabulary does not match the number of columns of \
                 topic_term_dists (where each row of topic_term_dists is a probability \
                 distribution of terms for a given topic).",
            )
            .with_hint(format!(
                "vocab has {} terms, topic_term_dists has {} columns",
                data.vocab.len(),
                data.topic_term_dists.n_cols()
            ))
        })
    }
}

// ─── d. term frequency matches vocabulary ───────────────────────────────────

struct TermFrequencyLengthRule;

impl ValidationRule for TermFrequencyLengthRule {
    fn name(&self) -> &str {
        "term_frequency_length"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        single(data.term_frequency.len() != data.vocab.len(), || {
            InputError::new(
                ErrorCode::TermFrequencyLengthMismatch,
                "/term_frequency",
                "Length of term_frequency not equal to the number of terms in the \
                 vocabulary (len of vocab).",
            )
        })
    }
}

// ─── e/f. rows are probability distributions ────────────────────────────────

/// Whether `sum`, rounded to [`ROW_SUM_DECIMALS`] decimals, equals 1.
pub fn sums_to_one(sum: f64) -> bool {
    let scale = 10f64.powi(ROW_SUM_DECIMALS);
    (sum * scale).round() / scale == 1.0
}

/// Indices of rows whose sum is not ≈ 1.
pub fn unnormalized_rows(table: &DistTable) -> Vec<usize> {
    table
        .row_sums()
        .into_iter()
        .enumerate()
        .filter(|&(_, s)| !sums_to_one(s))
        .map(|(i, _)| i)
        .collect()
}

struct NormalizedRowsRule {
    name: &'static str,
    field: &'static str,
    code: ErrorCode,
    select: fn(&ModelData) -> &DistTable,
}

impl NormalizedRowsRule {
    fn topic_term() -> Self {
        Self {
            name: "topic_term_normalized",
            field: "topic_term_dists",
            code: ErrorCode::TopicTermNotNormalized,
            select: |d| &d.topic_term_dists,
        }
    }

    fn doc_topic() -> Self {
        Self {
            name: "doc_topic_normalized",
            field: "doc_topic_dists",
            code: ErrorCode::DocTopicNotNormalized,
            select: |d| &d.doc_topic_dists,
        }
    }
}

impl ValidationRule for NormalizedRowsRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        let bad = unnormalized_rows((self.select)(data));
        single(!bad.is_empty(), || {
            let listed: Vec<String> = bad
                .iter()
                .take(MAX_LISTED_ROWS)
                .map(usize::to_string)
                .collect();
            let more = if bad.len() > MAX_LISTED_ROWS { ", ..." } else { "" };
            InputError::new(
                self.code,
                format!("/{}", self.field),
                format!(
                    "Not all rows (distributions) in {} sum to 1.",
                    self.field
                ),
            )
            .with_hint(format!(
                "{} row(s) do not sum to 1 (rows {}{more}); divide each row by its sum",
                bad.len(),
                listed.join(", ")
            ))
        })
    }
}

// ─── g. matrices are rectangular ────────────────────────────────────────────

struct RaggedRowsRule;

impl ValidationRule for RaggedRowsRule {
    fn name(&self) -> &str {
        "ragged_rows"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        [
            ("topic_term_dists", &data.topic_term_dists),
            ("doc_topic_dists", &data.doc_topic_dists),
        ]
        .into_iter()
        .filter(|(_, table)| !table.is_rectangular())
        .map(|(field, table)| {
            ValidationDiagnostic::error(
                InputError::new(
                    ErrorCode::RaggedRows,
                    format!("/{field}"),
                    format!("Rows of {field} have different lengths."),
                )
                .with_hint(format!(
                    "every {} row must have {} columns",
                    table.index_name,
                    table.n_cols()
                )),
            )
        })
        .collect()
    }
}

// ─── h. model is not empty ──────────────────────────────────────────────────

struct EmptyModelRule;

impl ValidationRule for EmptyModelRule {
    fn name(&self) -> &str {
        "empty_model"
    }

    fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
        [
            ("topics", "/topic_term_dists", data.n_topics()),
            ("terms", "/vocab", data.n_terms()),
            ("documents", "/doc_topic_dists", data.n_docs()),
        ]
        .into_iter()
        .filter(|&(_, _, n)| n == 0)
        .map(|(what, path, _)| {
            ValidationDiagnostic::error(InputError::new(
                ErrorCode::EmptyModel,
                path,
                format!("The model has no {what}."),
            ))
        })
        .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    /// 2 topics, 3 terms, 2 docs, all consistent.
    fn valid() -> ModelData {
        ModelData::normalize(
            vec![vec![0.5, 0.3, 0.2], vec![0.1, 0.1, 0.8]],
            vec![vec![0.9, 0.1], vec![0.2, 0.8]],
            vec![10.0, 20.0],
            vec!["a", "b", "c"],
            vec![5.0, 5.0, 20.0],
        )
    }

    // ─── Valid input ────────────────────────────────────────────────────

    #[test]
    fn test_consistent_input_is_valid() {
        let report = engine().validate(&valid());
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_rounding_tolerance() {
        assert!(sums_to_one(1.0));
        assert!(sums_to_one(0.996));
        assert!(sums_to_one(1.004));
        assert!(!sums_to_one(0.994));
        assert!(!sums_to_one(1.006));
        assert!(!sums_to_one(f64::NAN));
    }

    // ─── Individual rules ───────────────────────────────────────────────

    #[test]
    fn test_topic_count_mismatch() {
        let mut data = valid();
        data.doc_topic_dists = DistTable::new(
            vec![vec![0.5, 0.25, 0.25], vec![0.2, 0.4, 0.4]].into(),
            "doc",
            "topic",
        );
        let report = engine().validate(&data);
        assert!(report.contains(ErrorCode::TopicCountMismatch));
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_doc_count_mismatch() {
        let mut data = valid();
        data.doc_lengths = super::super::input::Series::new(vec![10.0].into(), "doc_length");
        let report = engine().validate(&data);
        assert!(report.contains(ErrorCode::DocCountMismatch));
    }

    #[test]
    fn test_vocab_and_term_frequency_mismatch() {
        let mut data = valid();
        data.vocab = super::super::input::Series::new(vec!["a", "b"].into(), "vocab");
        let report = engine().validate(&data);
        // vocab (2) != topic-term columns (3) and term_frequency (3) != vocab (2)
        assert!(report.contains(ErrorCode::VocabSizeMismatch));
        assert!(report.contains(ErrorCode::TermFrequencyLengthMismatch));
    }

    #[test]
    fn test_unnormalized_rows_reported_with_hint() {
        let mut data = valid();
        data.topic_term_dists = DistTable::new(
            vec![vec![0.5, 0.3, 0.3], vec![0.1, 0.1, 0.8]].into(),
            "topic",
            "term",
        );
        let report = engine().validate(&data);
        let err = report
            .errors()
            .find(|e| e.code == ErrorCode::TopicTermNotNormalized)
            .expect("normalization error");
        assert_eq!(err.path, "/topic_term_dists");
        assert!(err.hint.as_deref().unwrap().contains("rows 0"));
        assert!(!report.contains(ErrorCode::DocTopicNotNormalized));
    }

    #[test]
    fn test_ragged_rows() {
        let mut data = valid();
        data.doc_topic_dists =
            DistTable::new(vec![vec![0.9, 0.1], vec![1.0]].into(), "doc", "topic");
        let report = engine().validate(&data);
        assert!(report.contains(ErrorCode::RaggedRows));
    }

    #[test]
    fn test_empty_model() {
        let data = ModelData::normalize(
            Vec::<Vec<f64>>::new(),
            Vec::<Vec<f64>>::new(),
            Vec::<f64>::new(),
            Vec::<String>::new(),
            Vec::<f64>::new(),
        );
        let report = engine().validate(&data);
        assert_eq!(
            report.errors().filter(|e| e.code == ErrorCode::EmptyModel).count(),
            3
        );
    }

    // ─── Aggregation ────────────────────────────────────────────────────

    #[test]
    fn test_all_rules_run_without_short_circuit() {
        let data = ModelData::normalize(
            vec![vec![0.9, 0.9]],
            vec![vec![0.6, 0.6], vec![0.5, 0.5]],
            vec![1.0, 2.0, 3.0],
            vec!["x", "y", "z"],
            vec![1.0],
        );
        let report = engine().validate(&data);
        let codes: Vec<ErrorCode> = report.errors().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::TopicCountMismatch,
                ErrorCode::DocCountMismatch,
                ErrorCode::VocabSizeMismatch,
                ErrorCode::TermFrequencyLengthMismatch,
                ErrorCode::TopicTermNotNormalized,
                ErrorCode::DocTopicNotNormalized,
            ]
        );
    }

    #[test]
    fn test_bulleted_message() {
        let mut data = valid();
        data.term_frequency =
            super::super::input::Series::new(vec![1.0].into(), "term_frequency");
        let report = engine().validate(&data);
        assert_eq!(
            report.bulleted(),
            "\n * Length of term_frequency not equal to the number of terms in the \
             vocabulary (len of vocab)."
        );
    }

    #[test]
    fn test_custom_rule() {
        struct NoNegativeLengths;
        impl ValidationRule for NoNegativeLengths {
            fn name(&self) -> &str {
                "no_negative_lengths"
            }
            fn validate(&self, data: &ModelData) -> Vec<ValidationDiagnostic> {
                data.doc_lengths
                    .values()
                    .iter()
                    .filter(|&&l| l < 0.0)
                    .map(|_| {
                        ValidationDiagnostic::warning(InputError::new(
                            ErrorCode::DocCountMismatch,
                            "/doc_lengths",
                            "negative length",
                        ))
                    })
                    .collect()
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoNegativeLengths));
        let mut data = valid();
        data.doc_lengths =
            super::super::input::Series::new(vec![-1.0, 2.0].into(), "doc_length");
        let report = engine.validate(&data);
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(engine.rule_names(), vec!["no_negative_lengths"]);
    }

    #[test]
    fn test_report_serializes_flat() {
        let mut data = valid();
        data.vocab = super::super::input::Series::new(vec!["a"].into(), "vocab");
        let report = engine().validate(&data);
        let json = serde_json::to_value(&report).unwrap();
        let first = &json["diagnostics"][0];
        assert_eq!(first["severity"], "error");
        assert_eq!(first["code"], "vocab_size_mismatch");
    }
}
