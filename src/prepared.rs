//! The prepared, visualization-ready dataset.
//!
//! [`PreparedData`] is immutable once built. Its [`PreparedData::to_dict`]
//! form is the column-oriented document LDAvis front ends read:
//!
//! ```json
//! {
//!   "mdsDat":      { "x": [...], "y": [...], "topics": [...], "cluster": [...], "Freq": [...] },
//!   "tinfo":       { "Term": [...], "Freq": [...], "Total": [...], "Category": [...],
//!                    "logprob": [...], "loglift": [...] },
//!   "token.table": { "Topic": [...], "Freq": [...], "Term": [...] },
//!   "R": 30,
//!   "lambda.step": 0.01,
//!   "plot.opts": { "xlab": "PC1", "ylab": "PC2" },
//!   "topic.order": [...]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PrepareError, Result};
use crate::types::PlotOptions;

// ============================================================================
// Rows
// ============================================================================

/// Position of one topic on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCoordinate {
    pub x: f64,
    pub y: f64,
    /// Client-facing topic number.
    pub topic: usize,
    pub cluster: u32,
    /// Share of corpus tokens, in percent.
    pub freq: f64,
}

/// One bar of a bar chart: a term within the default view or a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicInfoRow {
    pub term: String,
    pub freq: f64,
    pub total: f64,
    /// `"Default"` or `"Topic{n}"`.
    pub category: String,
    pub logprob: f64,
    pub loglift: f64,
    /// Vocabulary position of `term`. Not serialized.
    pub term_id: usize,
}

impl TopicInfoRow {
    pub const DEFAULT_CATEGORY: &'static str = "Default";

    /// Category label of client-facing topic `n`.
    pub fn topic_category(n: usize) -> String {
        format!("Topic{n}")
    }

    /// `λ · logprob + (1 − λ) · loglift`
    pub fn relevance(&self, lambda: f64) -> f64 {
        lambda * self.logprob + (1.0 - lambda) * self.loglift
    }
}

/// Share of a term's tokens held by one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTableRow {
    pub term: String,
    /// Client-facing topic number.
    pub topic: usize,
    pub freq: f64,
    /// Vocabulary position of `term`. Not serialized.
    pub term_id: usize,
}

// ============================================================================
// Column-oriented document
// ============================================================================

/// `mdsDat` columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MdsColumns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub topics: Vec<usize>,
    pub cluster: Vec<u32>,
    #[serde(rename = "Freq")]
    pub freq: Vec<f64>,
}

/// `tinfo` columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicInfoColumns {
    #[serde(rename = "Term")]
    pub term: Vec<String>,
    #[serde(rename = "Freq")]
    pub freq: Vec<f64>,
    #[serde(rename = "Total")]
    pub total: Vec<f64>,
    #[serde(rename = "Category")]
    pub category: Vec<String>,
    pub logprob: Vec<f64>,
    pub loglift: Vec<f64>,
}

/// `token.table` columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenTableColumns {
    #[serde(rename = "Topic")]
    pub topic: Vec<usize>,
    #[serde(rename = "Freq")]
    pub freq: Vec<f64>,
    #[serde(rename = "Term")]
    pub term: Vec<String>,
}

/// The serialized shape of [`PreparedData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedDict {
    #[serde(rename = "mdsDat")]
    pub mds_dat: MdsColumns,
    pub tinfo: TopicInfoColumns,
    #[serde(rename = "token.table")]
    pub token_table: TokenTableColumns,
    #[serde(rename = "R")]
    pub r: usize,
    #[serde(rename = "lambda.step")]
    pub lambda_step: f64,
    #[serde(rename = "plot.opts")]
    pub plot_opts: PlotOptions,
    #[serde(rename = "topic.order")]
    pub topic_order: Vec<usize>,
}

// ============================================================================
// PreparedData
// ============================================================================

/// Output of [`crate::prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    topic_coordinates: Vec<TopicCoordinate>,
    topic_info: Vec<TopicInfoRow>,
    token_table: Vec<TokenTableRow>,
    r: usize,
    lambda_step: f64,
    plot_opts: PlotOptions,
    topic_order: Vec<usize>,
}

impl PreparedData {
    pub(crate) fn new(
        topic_coordinates: Vec<TopicCoordinate>,
        topic_info: Vec<TopicInfoRow>,
        token_table: Vec<TokenTableRow>,
        r: usize,
        lambda_step: f64,
        plot_opts: PlotOptions,
        topic_order: Vec<usize>,
    ) -> Self {
        Self {
            topic_coordinates,
            topic_info,
            token_table,
            r,
            lambda_step,
            plot_opts,
            topic_order,
        }
    }

    pub fn topic_coordinates(&self) -> &[TopicCoordinate] {
        &self.topic_coordinates
    }

    pub fn topic_info(&self) -> &[TopicInfoRow] {
        &self.topic_info
    }

    pub fn token_table(&self) -> &[TokenTableRow] {
        &self.token_table
    }

    /// Terms per bar chart, after clamping to the vocabulary size.
    pub fn r(&self) -> usize {
        self.r
    }

    pub fn lambda_step(&self) -> f64 {
        self.lambda_step
    }

    pub fn plot_opts(&self) -> &PlotOptions {
        &self.plot_opts
    }

    /// Input topic numbers (shifted by `start_index`) in display order.
    pub fn topic_order(&self) -> &[usize] {
        &self.topic_order
    }

    /// Number of topics.
    pub fn n_topics(&self) -> usize {
        self.topic_coordinates.len()
    }

    /// Rows of the default (no topic selected) view.
    pub fn default_terms(&self) -> impl Iterator<Item = &TopicInfoRow> {
        self.topic_info
            .iter()
            .filter(|row| row.category == TopicInfoRow::DEFAULT_CATEGORY)
    }

    /// Rows of client-facing topic `topic`, most relevant at `lambda` first.
    ///
    /// A `lambda` outside `[0, 1]` is treated as 1. Equal relevance keeps
    /// table order.
    pub fn sorted_terms(&self, topic: usize, lambda: f64) -> Vec<&TopicInfoRow> {
        let lambda = if (0.0..=1.0).contains(&lambda) { lambda } else { 1.0 };
        let category = TopicInfoRow::topic_category(topic);
        let mut rows: Vec<&TopicInfoRow> = self
            .topic_info
            .iter()
            .filter(|row| row.category == category)
            .collect();
        rows.sort_by(|a, b| b.relevance(lambda).total_cmp(&a.relevance(lambda)));
        rows
    }

    /// The R rows the bar chart of `topic` shows at `lambda`.
    pub fn top_terms(&self, topic: usize, lambda: f64) -> Vec<&TopicInfoRow> {
        let mut rows = self.sorted_terms(topic, lambda);
        rows.truncate(self.r);
        rows
    }

    /// Column-oriented form of the dataset.
    pub fn to_dict(&self) -> PreparedDict {
        let coords = &self.topic_coordinates;
        let mds_dat = MdsColumns {
            x: coords.iter().map(|c| c.x).collect(),
            y: coords.iter().map(|c| c.y).collect(),
            topics: coords.iter().map(|c| c.topic).collect(),
            cluster: coords.iter().map(|c| c.cluster).collect(),
            freq: coords.iter().map(|c| c.freq).collect(),
        };

        let info = &self.topic_info;
        let tinfo = TopicInfoColumns {
            term: info.iter().map(|r| r.term.clone()).collect(),
            freq: info.iter().map(|r| r.freq).collect(),
            total: info.iter().map(|r| r.total).collect(),
            category: info.iter().map(|r| r.category.clone()).collect(),
            logprob: info.iter().map(|r| r.logprob).collect(),
            loglift: info.iter().map(|r| r.loglift).collect(),
        };

        let tokens = &self.token_table;
        let token_table = TokenTableColumns {
            topic: tokens.iter().map(|r| r.topic).collect(),
            freq: tokens.iter().map(|r| r.freq).collect(),
            term: tokens.iter().map(|r| r.term.clone()).collect(),
        };

        PreparedDict {
            mds_dat,
            tinfo,
            token_table,
            r: self.r,
            lambda_step: self.lambda_step,
            plot_opts: self.plot_opts.clone(),
            topic_order: self.topic_order.clone(),
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_dict())?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_dict())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_dict())?)
    }

    /// Write the JSON document to `path`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| PrepareError::io(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(term: &str, category: &str, logprob: f64, loglift: f64) -> TopicInfoRow {
        TopicInfoRow {
            term: term.to_string(),
            freq: 1.0,
            total: 2.0,
            category: category.to_string(),
            logprob,
            loglift,
            term_id: 0,
        }
    }

    fn data() -> PreparedData {
        PreparedData::new(
            vec![
                TopicCoordinate { x: 0.1, y: -0.2, topic: 1, cluster: 1, freq: 60.0 },
                TopicCoordinate { x: -0.1, y: 0.2, topic: 2, cluster: 1, freq: 40.0 },
            ],
            vec![
                row("a", "Default", 2.0, 2.0),
                row("b", "Default", 1.0, 1.0),
                row("a", "Topic1", -0.5, 0.1),
                row("b", "Topic1", -1.0, 0.9),
                row("c", "Topic1", -2.0, 0.5),
                row("b", "Topic2", -0.7, 0.3),
            ],
            vec![TokenTableRow { term: "a".into(), topic: 1, freq: 1.0, term_id: 0 }],
            2,
            0.5,
            PlotOptions::default(),
            vec![2, 1],
        )
    }

    #[test]
    fn test_sorted_terms_extremes() {
        let d = data();
        let by_prob: Vec<&str> = d.sorted_terms(1, 1.0).iter().map(|r| r.term.as_str()).collect();
        assert_eq!(by_prob, vec!["a", "b", "c"]);
        let by_lift: Vec<&str> = d.sorted_terms(1, 0.0).iter().map(|r| r.term.as_str()).collect();
        assert_eq!(by_lift, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sorted_terms_out_of_range_lambda() {
        let d = data();
        assert_eq!(d.sorted_terms(1, 7.0), d.sorted_terms(1, 1.0));
        assert_eq!(d.sorted_terms(1, -1.0), d.sorted_terms(1, 1.0));
        assert_eq!(d.sorted_terms(1, f64::NAN), d.sorted_terms(1, 1.0));
        assert!(d.sorted_terms(9, 0.5).is_empty());
    }

    #[test]
    fn test_top_terms_truncates_to_r() {
        assert_eq!(data().top_terms(1, 1.0).len(), 2);
        assert_eq!(data().top_terms(2, 1.0).len(), 1);
    }

    #[test]
    fn test_to_dict_keys() {
        let value = data().to_value().unwrap();
        for key in ["mdsDat", "tinfo", "token.table", "R", "lambda.step", "plot.opts", "topic.order"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["mdsDat"]["Freq"], serde_json::json!([60.0, 40.0]));
        assert_eq!(value["tinfo"]["Category"][2], "Topic1");
        assert_eq!(value["token.table"]["Term"], serde_json::json!(["a"]));
        assert_eq!(value["plot.opts"]["xlab"], "PC1");
        assert_eq!(value["topic.order"], serde_json::json!([2, 1]));
        assert!(value["tinfo"].get("term_id").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let d = data();
        let json = d.to_json().unwrap();
        let back: PreparedDict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d.to_dict());
        assert!(d.to_json_pretty().unwrap().contains('\n'));
    }

    #[test]
    fn test_save_json() {
        let path = std::env::temp_dir().join(format!("rapid_ldavis_{}.json", std::process::id()));
        data().save_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, data().to_json().unwrap());
    }

    #[test]
    fn test_save_json_bad_path() {
        let err = data().save_json("/nonexistent-dir/out.json").unwrap_err();
        assert!(matches!(err, PrepareError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent-dir/out.json"));
    }
}
