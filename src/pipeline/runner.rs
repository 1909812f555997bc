//! Pipeline runner: orchestrates the stages of [`prepare`].
//!
//! Stages run in a fixed order:
//!
//! 1. normalize the five inputs ([`super::input`])
//! 2. validate them, reporting every problem at once ([`super::validation`])
//! 3. reorder topics by corpus mass ([`super::reorder`])
//! 4. term statistics and the parallel relevance sweep ([`super::term_stats`])
//! 5. token table ([`super::token_table`])
//! 6. topic projection ([`crate::projection`])
//! 7. assemble [`PreparedData`]
//!
//! Only stage 4 uses more than one thread. Nothing expensive runs before
//! validation has passed.

use crate::errors::{PrepareError, Result};
use crate::pipeline::input::{MatrixInput, ModelData, SeriesInput};
use crate::pipeline::reorder::{reorder_topics, TopicOrdering};
use crate::pipeline::term_stats::{topic_info, TermStatistics};
use crate::pipeline::token_table::token_table;
use crate::pipeline::validation::ValidationEngine;
use crate::prepared::{PreparedData, TopicCoordinate};
use crate::types::{PrepareConfig, DEFAULT_CLUSTER};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Prepare a fitted topic model for visualization.
///
/// Takes the topic-term and doc-topic distributions, document lengths,
/// vocabulary and term frequencies, and returns the ranked, projected
/// dataset an LDAvis front end renders.
///
/// # Errors
///
/// - [`PrepareError::InvalidConfig`] when `config` is out of range
/// - [`PrepareError::Validation`] listing every shape or normalization problem
/// - [`PrepareError::Numerical`] when a probability or topic share is zero
/// - [`PrepareError::Projection`] when a custom ordination misbehaves
///
/// # Example
///
/// ```
/// use rapid_ldavis::{prepare, PrepareConfig};
///
/// let data = prepare(
///     vec![vec![0.7, 0.2, 0.1], vec![0.1, 0.3, 0.6]],
///     vec![vec![0.9, 0.1], vec![0.2, 0.8]],
///     vec![10.0, 12.0],
///     vec!["apple", "pear", "plum"],
///     vec![7.0, 6.0, 9.0],
///     &PrepareConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(data.n_topics(), 2);
/// assert_eq!(data.r(), 3);
/// ```
pub fn prepare(
    topic_term_dists: impl Into<MatrixInput>,
    doc_topic_dists: impl Into<MatrixInput>,
    doc_lengths: impl Into<SeriesInput<f64>>,
    vocab: impl Into<SeriesInput<String>>,
    term_frequency: impl Into<SeriesInput<f64>>,
    config: &PrepareConfig,
) -> Result<PreparedData> {
    let data = {
        trace_stage!("normalize");
        ModelData::normalize(
            topic_term_dists,
            doc_topic_dists,
            doc_lengths,
            vocab,
            term_frequency,
        )
    };

    prepare_model(data, config)
}

/// Run the pipeline on already-normalized input.
pub fn prepare_model(data: ModelData, config: &PrepareConfig) -> Result<PreparedData> {
    config.validate()?;
    if config.start_index.checked_add(data.n_topics()).is_none() {
        return Err(PrepareError::invalid_config(format!(
            "start_index {} leaves no room to number {} topics",
            config.start_index,
            data.n_topics()
        )));
    }

    {
        trace_stage!("validate");
        let report = ValidationEngine::with_defaults().validate(&data);
        if report.has_errors() {
            return Err(PrepareError::validation(report));
        }
        for warning in report.warnings() {
            tracing::warn!(%warning, "model input");
        }
    }

    let r = config.r.min(data.n_terms());
    tracing::debug!(
        topics = data.n_topics(),
        docs = data.n_docs(),
        terms = data.n_terms(),
        r,
        "input validated"
    );

    let ModelData {
        topic_term_dists,
        doc_topic_dists,
        doc_lengths,
        vocab,
        ..
    } = data;
    let vocab = vocab.into_values();

    let ordering = {
        trace_stage!("reorder");
        reorder_topics(
            topic_term_dists.rows(),
            doc_topic_dists.rows(),
            doc_lengths.values(),
            config.sort_topics,
        )
    };

    let stats = {
        trace_stage!("term_stats");
        TermStatistics::compute(&ordering)?
    };

    let info = {
        trace_stage!("relevance");
        topic_info(
            &ordering,
            &stats,
            &vocab,
            r,
            config.lambda_step,
            config.workers(),
            config.start_index,
        )?
    };

    let tokens = {
        trace_stage!("token_table");
        token_table(&info, &stats, &vocab, config.start_index)
    };

    let coordinates = {
        trace_stage!("projection");
        topic_coordinates(&ordering, config)?
    };

    tracing::debug!(
        topic_info_rows = info.len(),
        token_table_rows = tokens.len(),
        ordination = config.ordination.name(),
        "prepared"
    );

    Ok(PreparedData::new(
        coordinates,
        info,
        tokens,
        r,
        config.lambda_step,
        config.plot_opts.clone(),
        ordering.client_order(config.start_index),
    ))
}

/// Project the reordered topics and attach their numbers and shares.
fn topic_coordinates(
    ordering: &TopicOrdering,
    config: &PrepareConfig,
) -> Result<Vec<TopicCoordinate>> {
    let points = config.ordination.project(&ordering.topic_term)?;
    Ok(points
        .into_iter()
        .zip(&ordering.proportion)
        .enumerate()
        .map(|(position, ([x, y], &proportion))| TopicCoordinate {
            x,
            y,
            topic: TopicOrdering::client_topic(position, config.start_index),
            cluster: DEFAULT_CLUSTER,
            freq: proportion * 100.0,
        })
        .collect())
}
