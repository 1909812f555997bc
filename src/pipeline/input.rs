//! Input normalization.
//!
//! Topic models come out of many toolkits in many shapes. This module
//! accepts either plain arrays or already-labeled tables and turns them into
//! positional, named structures the rest of the pipeline indexes by
//! position only. Labels are discarded: the index of a row is its ID.
//!
//! Normalization never fails. Malformed shapes are reported by the
//! [`super::validation::ValidationEngine`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Caller-facing input forms
// ============================================================================

/// A 2-D array carrying row and column labels (e.g. a data frame export).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// A 1-D sequence carrying index labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries<T> {
    pub index: Vec<String>,
    pub values: Vec<T>,
}

/// Matrix input: a plain 2-D array or a labeled table.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixInput {
    Dense(Vec<Vec<f64>>),
    Labeled(LabeledMatrix),
}

impl From<Vec<Vec<f64>>> for MatrixInput {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::Dense(rows)
    }
}

impl From<&[Vec<f64>]> for MatrixInput {
    fn from(rows: &[Vec<f64>]) -> Self {
        Self::Dense(rows.to_vec())
    }
}

impl From<&Vec<Vec<f64>>> for MatrixInput {
    fn from(rows: &Vec<Vec<f64>>) -> Self {
        Self::Dense(rows.clone())
    }
}

impl<const N: usize> From<Vec<[f64; N]>> for MatrixInput {
    fn from(rows: Vec<[f64; N]>) -> Self {
        Self::Dense(rows.into_iter().map(|r| r.to_vec()).collect())
    }
}

impl From<LabeledMatrix> for MatrixInput {
    fn from(table: LabeledMatrix) -> Self {
        Self::Labeled(table)
    }
}

/// Sequence input: a plain sequence or a labeled one.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput<T> {
    Plain(Vec<T>),
    Labeled(LabeledSeries<T>),
}

impl<T> From<Vec<T>> for SeriesInput<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Plain(values)
    }
}

impl<T: Clone> From<&[T]> for SeriesInput<T> {
    fn from(values: &[T]) -> Self {
        Self::Plain(values.to_vec())
    }
}

impl<T: Clone> From<&Vec<T>> for SeriesInput<T> {
    fn from(values: &Vec<T>) -> Self {
        Self::Plain(values.clone())
    }
}

impl<T> From<LabeledSeries<T>> for SeriesInput<T> {
    fn from(series: LabeledSeries<T>) -> Self {
        Self::Labeled(series)
    }
}

impl From<Vec<&str>> for SeriesInput<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::Plain(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for SeriesInput<String> {
    fn from(values: &[&str]) -> Self {
        Self::Plain(values.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<Vec<u32>> for SeriesInput<f64> {
    fn from(values: Vec<u32>) -> Self {
        Self::Plain(values.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<usize>> for SeriesInput<f64> {
    fn from(values: Vec<usize>) -> Self {
        Self::Plain(values.into_iter().map(|v| v as f64).collect())
    }
}

// ============================================================================
// Normalized forms
// ============================================================================

/// A positional table of distributions with named axes.
#[derive(Debug, Clone, PartialEq)]
pub struct DistTable {
    /// Name of the row axis (`"topic"` or `"doc"`).
    pub index_name: &'static str,
    /// Name of the column axis (`"term"` or `"topic"`).
    pub columns_name: &'static str,
    rows: Vec<Vec<f64>>,
}

impl DistTable {
    /// Build a table from a matrix input, discarding any labels.
    pub fn new(data: MatrixInput, index_name: &'static str, columns_name: &'static str) -> Self {
        let rows = match data {
            MatrixInput::Dense(rows) => rows,
            MatrixInput::Labeled(table) => table.values,
        };
        Self {
            index_name,
            columns_name,
            rows,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the first row (0 when empty).
    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// `(rows, cols)`, mirroring an array shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// Whether every row has the same length as the first.
    pub fn is_rectangular(&self) -> bool {
        let cols = self.n_cols();
        self.rows.iter().all(|r| r.len() == cols)
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}

/// A named sequence with a 0-based positional index.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    pub name: &'static str,
    values: Vec<T>,
}

impl<T> Series<T> {
    /// Build a series from a sequence input, renumbering any labeled index.
    pub fn new(data: SeriesInput<T>, name: &'static str) -> Self {
        let values = match data {
            SeriesInput::Plain(values) => values,
            SeriesInput::Labeled(series) => series.values,
        };
        Self { name, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

/// The five model inputs after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub topic_term_dists: DistTable,
    pub doc_topic_dists: DistTable,
    pub doc_lengths: Series<f64>,
    pub vocab: Series<String>,
    pub term_frequency: Series<f64>,
}

impl ModelData {
    /// Normalize the five inputs into positional, named structures.
    pub fn normalize(
        topic_term_dists: impl Into<MatrixInput>,
        doc_topic_dists: impl Into<MatrixInput>,
        doc_lengths: impl Into<SeriesInput<f64>>,
        vocab: impl Into<SeriesInput<String>>,
        term_frequency: impl Into<SeriesInput<f64>>,
    ) -> Self {
        Self {
            topic_term_dists: DistTable::new(topic_term_dists.into(), "topic", "term"),
            doc_topic_dists: DistTable::new(doc_topic_dists.into(), "doc", "topic"),
            doc_lengths: Series::new(doc_lengths.into(), "doc_length"),
            vocab: Series::new(vocab.into(), "vocab"),
            term_frequency: Series::new(term_frequency.into(), "term_frequency"),
        }
    }

    /// Number of topics (topic-term rows).
    pub fn n_topics(&self) -> usize {
        self.topic_term_dists.n_rows()
    }

    /// Number of documents (doc-topic rows).
    pub fn n_docs(&self) -> usize {
        self.doc_topic_dists.n_rows()
    }

    /// Number of vocabulary terms.
    pub fn n_terms(&self) -> usize {
        self.vocab.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_matrix_drops_labels() {
        let labeled = LabeledMatrix {
            row_labels: vec!["b".into(), "a".into()],
            column_labels: vec!["x".into(), "y".into()],
            values: vec![vec![0.5, 0.5], vec![0.1, 0.9]],
        };
        let table = DistTable::new(labeled.into(), "topic", "term");
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.rows()[1], vec![0.1, 0.9]);
        assert_eq!(table.index_name, "topic");
        assert_eq!(table.columns_name, "term");
    }

    #[test]
    fn test_labeled_series_renumbered() {
        let series = LabeledSeries {
            index: vec!["doc_9".into(), "doc_3".into()],
            values: vec![12.0, 7.0],
        };
        let s = Series::new(SeriesInput::from(series), "doc_length");
        assert_eq!(s.values(), &[12.0, 7.0]);
        assert_eq!(s.name, "doc_length");
    }

    #[test]
    fn test_row_sums_and_rectangularity() {
        let table = DistTable::new(
            vec![vec![0.25, 0.75], vec![0.5, 0.25, 0.25]].into(),
            "doc",
            "topic",
        );
        assert_eq!(table.row_sums(), vec![1.0, 1.0]);
        assert!(!table.is_rectangular());
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_empty_table_shape() {
        let table = DistTable::new(Vec::<Vec<f64>>::new().into(), "topic", "term");
        assert_eq!(table.shape(), (0, 0));
        assert!(table.is_rectangular());
    }

    #[test]
    fn test_normalize_accepts_mixed_forms() {
        let data = ModelData::normalize(
            vec![[0.5, 0.5]],
            vec![vec![1.0], vec![1.0]],
            vec![3u32, 4],
            vec!["apple", "pear"],
            vec![2.0, 5.0],
        );
        assert_eq!(data.n_topics(), 1);
        assert_eq!(data.n_docs(), 2);
        assert_eq!(data.n_terms(), 2);
        assert_eq!(data.doc_lengths.values(), &[3.0, 4.0]);
    }
}
