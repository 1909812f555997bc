//! JSON interchange.
//!
//! Reads the model document the LDAvis R package writes (`phi`, `theta`,
//! `doc.length`, `vocab`, `term.frequency`), optionally carrying a
//! `config` object, and runs [`crate::prepare`] on it.
//!
//! ```json
//! {
//!   "phi": [[0.5, 0.5], [0.1, 0.9]],
//!   "theta": [[0.7, 0.3]],
//!   "doc.length": [12],
//!   "vocab": ["apple", "pear"],
//!   "term.frequency": [6, 6],
//!   "config": { "R": 10, "lambda_step": 0.1, "mds": "tsne" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PrepareError, Result};
use crate::pipeline::runner::prepare;
use crate::prepared::PreparedData;
use crate::types::{PlotOptions, PrepareConfig, DEFAULT_LAMBDA_STEP, DEFAULT_R};

/// The five model arrays under their R-style keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    /// Topic-term distributions, K × W.
    pub phi: Vec<Vec<f64>>,
    /// Doc-topic distributions, D × K.
    pub theta: Vec<Vec<f64>>,
    #[serde(rename = "doc.length")]
    pub doc_length: Vec<f64>,
    pub vocab: Vec<String>,
    #[serde(rename = "term.frequency")]
    pub term_frequency: Vec<f64>,
}

/// Parameters of a JSON-driven run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonConfig {
    #[serde(rename = "R", default = "default_r")]
    pub r: usize,
    #[serde(default = "default_lambda_step")]
    pub lambda_step: f64,
    /// `pcoa`, `mmds` or `tsne`; anything else falls back to `pcoa`.
    #[serde(default = "default_mds")]
    pub mds: String,
    #[serde(default = "default_n_jobs")]
    pub n_jobs: i32,
    #[serde(default)]
    pub plot_opts: PlotOptions,
    #[serde(default = "default_sort_topics")]
    pub sort_topics: bool,
    #[serde(default = "default_start_index")]
    pub start_index: usize,
}

fn default_r() -> usize {
    DEFAULT_R
}

fn default_lambda_step() -> f64 {
    DEFAULT_LAMBDA_STEP
}

fn default_mds() -> String {
    "pcoa".to_string()
}

fn default_n_jobs() -> i32 {
    -1
}

fn default_sort_topics() -> bool {
    true
}

fn default_start_index() -> usize {
    1
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            r: default_r(),
            lambda_step: default_lambda_step(),
            mds: default_mds(),
            n_jobs: default_n_jobs(),
            plot_opts: PlotOptions::default(),
            sort_topics: default_sort_topics(),
            start_index: default_start_index(),
        }
    }
}

impl From<&JsonConfig> for PrepareConfig {
    fn from(jc: &JsonConfig) -> Self {
        PrepareConfig::default()
            .with_r(jc.r)
            .with_lambda_step(jc.lambda_step)
            .with_ordination_name(&jc.mds)
            .with_parallelism(jc.n_jobs)
            .with_plot_opts(jc.plot_opts.clone())
            .with_sort_topics(jc.sort_topics)
            .with_start_index(jc.start_index)
    }
}

/// A model plus optional run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    #[serde(flatten)]
    pub model: ModelInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<JsonConfig>,
}

impl JsonDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The run configuration, defaulted when absent.
    pub fn prepare_config(&self) -> PrepareConfig {
        self.config
            .as_ref()
            .map(PrepareConfig::from)
            .unwrap_or_default()
    }

    /// Run the pipeline with `config`.
    pub fn prepare_with(self, config: &PrepareConfig) -> Result<PreparedData> {
        let ModelInput {
            phi,
            theta,
            doc_length,
            vocab,
            term_frequency,
        } = self.model;
        prepare(phi, theta, doc_length, vocab, term_frequency, config)
    }

    /// Run the pipeline with the embedded configuration.
    pub fn prepare(self) -> Result<PreparedData> {
        let config = self.prepare_config();
        self.prepare_with(&config)
    }
}

/// Parse a model document and prepare it.
pub fn prepare_from_json(json: &str) -> Result<PreparedData> {
    JsonDocument::from_json(json)?.prepare()
}

/// Read a model document from `path` and prepare it.
pub fn prepare_from_json_file(path: impl AsRef<Path>) -> Result<PreparedData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| PrepareError::io(format!("{}: {e}", path.display())))?;
    prepare_from_json(&text)
}
