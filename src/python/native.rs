//! Native Python interface
//!
//! `prepare` takes the five model arrays as Python lists (or anything
//! pyo3 can convert to them) and returns a `PreparedData` object.

use std::collections::HashMap;

use crate::errors::PrepareError;
use crate::pipeline::runner;
use crate::prepared::{PreparedData, TopicInfoRow};
use crate::types::{PlotOptions, PrepareConfig};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Convert a [`PrepareError`] into the matching Python exception.
pub(crate) fn to_py_err(err: PrepareError) -> PyErr {
    match err {
        PrepareError::Io { .. } => PyIOError::new_err(err.to_string()),
        PrepareError::Internal { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// One bar of a bar chart
#[pyclass(name = "TopicInfoRow")]
#[derive(Clone)]
pub struct PyTopicInfoRow {
    #[pyo3(get)]
    pub term: String,
    #[pyo3(get)]
    pub freq: f64,
    #[pyo3(get)]
    pub total: f64,
    #[pyo3(get)]
    pub category: String,
    #[pyo3(get)]
    pub logprob: f64,
    #[pyo3(get)]
    pub loglift: f64,
}

#[pymethods]
impl PyTopicInfoRow {
    fn __repr__(&self) -> String {
        format!(
            "TopicInfoRow(term='{}', category='{}', logprob={:.4}, loglift={:.4})",
            self.term, self.category, self.logprob, self.loglift
        )
    }

    fn __str__(&self) -> String {
        self.term.clone()
    }
}

impl From<&TopicInfoRow> for PyTopicInfoRow {
    fn from(row: &TopicInfoRow) -> Self {
        Self {
            term: row.term.clone(),
            freq: row.freq,
            total: row.total,
            category: row.category.clone(),
            logprob: row.logprob,
            loglift: row.loglift,
        }
    }
}

/// Visualization-ready output of `prepare`
#[pyclass(name = "PreparedData", frozen)]
pub struct PyPreparedData {
    inner: PreparedData,
}

impl From<PreparedData> for PyPreparedData {
    fn from(inner: PreparedData) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyPreparedData {
    fn __repr__(&self) -> String {
        format!(
            "PreparedData(topics={}, R={}, lambda_step={}, rows={})",
            self.inner.n_topics(),
            self.inner.r(),
            self.inner.lambda_step(),
            self.inner.topic_info().len()
        )
    }

    #[getter(R)]
    fn r(&self) -> usize {
        self.inner.r()
    }

    #[getter]
    fn lambda_step(&self) -> f64 {
        self.inner.lambda_step()
    }

    #[getter]
    fn topic_order(&self) -> Vec<usize> {
        self.inner.topic_order().to_vec()
    }

    #[getter]
    fn plot_opts(&self) -> HashMap<String, String> {
        let opts = self.inner.plot_opts();
        HashMap::from([
            ("xlab".to_string(), opts.xlab.clone()),
            ("ylab".to_string(), opts.ylab.clone()),
        ])
    }

    /// Topic positions as `(x, y, topic, cluster, freq)` tuples
    #[getter]
    fn topic_coordinates(&self) -> Vec<(f64, f64, usize, u32, f64)> {
        self.inner
            .topic_coordinates()
            .iter()
            .map(|c| (c.x, c.y, c.topic, c.cluster, c.freq))
            .collect()
    }

    #[getter]
    fn topic_info(&self) -> Vec<PyTopicInfoRow> {
        self.inner.topic_info().iter().map(PyTopicInfoRow::from).collect()
    }

    /// Token table as `(term, topic, freq)` tuples
    #[getter]
    fn token_table(&self) -> Vec<(String, usize, f64)> {
        self.inner
            .token_table()
            .iter()
            .map(|r| (r.term.clone(), r.topic, r.freq))
            .collect()
    }

    /// Rows of `topic` ordered by relevance at `lambda_`
    #[pyo3(signature = (topic, lambda_ = 1.0))]
    fn sorted_terms(&self, topic: usize, lambda_: f64) -> Vec<PyTopicInfoRow> {
        self.inner
            .sorted_terms(topic, lambda_)
            .into_iter()
            .map(PyTopicInfoRow::from)
            .collect()
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }

    /// The LDAvis document as a Python dict
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let text = self.inner.to_json().map_err(to_py_err)?;
        py.import_bound("json")?.call_method1("loads", (text,))
    }

    fn save_json(&self, path: &str) -> PyResult<()> {
        self.inner.save_json(path).map_err(to_py_err)
    }
}

/// Transform topic model distributions into the LDAvis data structures.
#[pyfunction]
#[pyo3(signature = (
    topic_term_dists,
    doc_topic_dists,
    doc_lengths,
    vocab,
    term_frequency,
    R=30,
    lambda_step=0.01,
    mds="pcoa",
    n_jobs=-1,
    plot_opts=None,
    sort_topics=true,
    start_index=1
))]
#[allow(clippy::too_many_arguments, non_snake_case)]
pub fn prepare(
    py: Python<'_>,
    topic_term_dists: Vec<Vec<f64>>,
    doc_topic_dists: Vec<Vec<f64>>,
    doc_lengths: Vec<f64>,
    vocab: Vec<String>,
    term_frequency: Vec<f64>,
    R: usize,
    lambda_step: f64,
    mds: &str,
    n_jobs: i32,
    plot_opts: Option<HashMap<String, String>>,
    sort_topics: bool,
    start_index: usize,
) -> PyResult<PyPreparedData> {
    let mut opts = PlotOptions::default();
    if let Some(map) = plot_opts {
        if let Some(x) = map.get("xlab") {
            opts.xlab = x.clone();
        }
        if let Some(y) = map.get("ylab") {
            opts.ylab = y.clone();
        }
    }

    let config = PrepareConfig::default()
        .with_r(R)
        .with_lambda_step(lambda_step)
        .with_ordination_name(mds)
        .with_parallelism(n_jobs)
        .with_plot_opts(opts)
        .with_sort_topics(sort_topics)
        .with_start_index(start_index);

    let prepared = py
        .allow_threads(|| {
            runner::prepare(
                topic_term_dists,
                doc_topic_dists,
                doc_lengths,
                vocab,
                term_frequency,
                &config,
            )
        })
        .map_err(to_py_err)?;
    Ok(prepared.into())
}
