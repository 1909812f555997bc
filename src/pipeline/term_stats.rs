//! Term statistics: saliency, relevance and the topic-info table.
//!
//! The default view ranks terms by saliency (Chuang et al., 2012). Each
//! topic view ranks terms by relevance (Sievert & Shirley, 2014):
//!
//! ```text
//! relevance(w | t, λ) = λ · ln p(w|t) + (1 − λ) · ln(p(w|t) / p(w))
//! ```
//!
//! The front end lets the user slide λ, so the top R terms are collected
//! for every λ on a grid and each topic keeps the union of them. The grid
//! is swept in parallel on a rayon pool scoped to the call.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::reorder::TopicOrdering;
use crate::errors::{PrepareError, Result};
use crate::prepared::TopicInfoRow;
use crate::types::{round_to, LOG_DECIMALS, MAX_LAMBDA_STEPS};

// ============================================================================
// Corpus-level statistics
// ============================================================================

/// Per-term statistics derived from the reordered topics.
#[derive(Debug, Clone, PartialEq)]
pub struct TermStatistics {
    /// Token count per (topic, term), K × W, columns summing to `term_frequency`.
    pub term_topic_freq: Vec<Vec<f64>>,
    /// Token count per term, recomputed from the model.
    pub term_frequency: Vec<f64>,
    /// Marginal distribution over terms.
    pub term_proportion: Vec<f64>,
    /// `term_proportion · distinctiveness` per term.
    pub saliency: Vec<f64>,
}

impl TermStatistics {
    /// Compute term frequencies and saliency.
    ///
    /// The caller's term frequencies are not used: frequencies are rebuilt
    /// from `topic_term · mass` so bar widths stay consistent with the model.
    ///
    /// Fails with [`PrepareError::Numerical`] when a logarithm or division
    /// further down would be undefined.
    pub fn compute(ordering: &TopicOrdering) -> Result<Self> {
        check_ordering(ordering)?;

        let k = ordering.n_topics();
        let w = ordering.topic_term.first().map_or(0, Vec::len);

        let mut term_topic_freq: Vec<Vec<f64>> = ordering
            .topic_term
            .iter()
            .zip(&ordering.mass)
            .map(|(row, &m)| row.iter().map(|p| p * m).collect())
            .collect();

        let mut term_frequency = vec![0.0; w];
        for row in &term_topic_freq {
            for (f, v) in term_frequency.iter_mut().zip(row) {
                *f += v;
            }
        }
        if let Some(term) = term_frequency.iter().position(|&f| !(f > 0.0)) {
            return Err(PrepareError::numerical(format!(
                "term {term} has zero frequency across all topics"
            )));
        }

        // Rescale so each column sums to its term frequency.
        for term in 0..w {
            let column: f64 = term_topic_freq.iter().map(|row| row[term]).sum();
            let scale = term_frequency[term] / column;
            for row in term_topic_freq.iter_mut() {
                row[term] *= scale;
            }
        }

        let total: f64 = term_frequency.iter().sum();
        let term_proportion: Vec<f64> = term_frequency.iter().map(|f| f / total).collect();

        let mut saliency = vec![0.0; w];
        for (term, s) in saliency.iter_mut().enumerate() {
            let column: f64 = (0..k).map(|t| ordering.topic_term[t][term]).sum();
            let distinctiveness: f64 = (0..k)
                .map(|t| {
                    let p = ordering.topic_term[t][term] / column;
                    p * (p / ordering.proportion[t]).ln()
                })
                .sum();
            *s = term_proportion[term] * distinctiveness;
        }

        Ok(Self {
            term_topic_freq,
            term_frequency,
            term_proportion,
            saliency,
        })
    }

    /// Number of vocabulary terms.
    pub fn n_terms(&self) -> usize {
        self.term_frequency.len()
    }

    /// The R most salient terms, shown when no topic is selected.
    ///
    /// Equal saliency keeps vocabulary order. `Freq` and `Total` are the
    /// floored term frequency; `logprob` and `loglift` carry the rank
    /// (R for the first row down to 1) and only order the default view.
    pub fn default_view(&self, vocab: &[String], r: usize) -> Vec<TopicInfoRow> {
        let mut terms: Vec<usize> = (0..self.n_terms()).collect();
        terms.sort_by(|&a, &b| self.saliency[b].total_cmp(&self.saliency[a]));
        terms.truncate(r);

        terms
            .into_iter()
            .enumerate()
            .map(|(rank, term)| {
                let freq = self.term_frequency[term].floor();
                let score = (r - rank) as f64;
                TopicInfoRow {
                    term: vocab[term].clone(),
                    freq,
                    total: freq,
                    category: TopicInfoRow::DEFAULT_CATEGORY.to_string(),
                    logprob: score,
                    loglift: score,
                    term_id: term,
                }
            })
            .collect()
    }
}

fn check_ordering(ordering: &TopicOrdering) -> Result<()> {
    let total: f64 = ordering.mass.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(PrepareError::numerical(format!(
            "total topic mass is {total}; doc_lengths and doc_topic_dists attribute no tokens"
        )));
    }
    for (pos, (&topic, &prop)) in ordering.order.iter().zip(&ordering.proportion).enumerate() {
        if !(prop > 0.0) {
            return Err(PrepareError::numerical(format!(
                "topic {topic} has zero proportion of the corpus"
            )));
        }
        if let Some(term) = ordering.topic_term[pos]
            .iter()
            .position(|&p| !(p > 0.0) || !p.is_finite())
        {
            return Err(PrepareError::numerical(format!(
                "topic_term_dists[{topic}][{term}] = {} is not a positive probability",
                ordering.topic_term[pos][term]
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Relevance sweep
// ============================================================================

/// The λ values swept: `0, step, 2·step, …` capped at 1.
///
/// Holds `⌈1/step⌉ + 1` values; the last one is exactly 1. Fails with
/// [`PrepareError::InvalidConfig`] when `step` is not in (0, 1] or the grid
/// would exceed [`MAX_LAMBDA_STEPS`] steps.
pub fn lambda_grid(step: f64) -> Result<Vec<f64>> {
    let steps = (1.0 / step - 1e-9).ceil();
    if !(step > 0.0 && step <= 1.0) || !(steps <= MAX_LAMBDA_STEPS as f64) {
        return Err(PrepareError::invalid_config(format!(
            "lambda_step {step} does not give a grid of at most {MAX_LAMBDA_STEPS} steps"
        )));
    }
    let n = (steps as usize)
        .checked_add(1)
        .ok_or_else(|| PrepareError::invalid_config("lambda grid size overflows"))?;
    Ok((0..n).map(|i| (i as f64 * step).min(1.0)).collect())
}

/// Log tables the relevance score is built from, K × W.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceTables {
    /// `ln p(w|t)`
    pub log_ttd: Vec<Vec<f64>>,
    /// `ln(p(w|t) / p(w))`
    pub log_lift: Vec<Vec<f64>>,
}

impl RelevanceTables {
    pub fn new(ordering: &TopicOrdering, stats: &TermStatistics) -> Self {
        let log_ttd: Vec<Vec<f64>> = ordering
            .topic_term
            .iter()
            .map(|row| row.iter().map(|p| p.ln()).collect())
            .collect();
        let log_lift = ordering
            .topic_term
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&stats.term_proportion)
                    .map(|(p, q)| (p / q).ln())
                    .collect()
            })
            .collect();
        Self { log_ttd, log_lift }
    }

    pub fn n_topics(&self) -> usize {
        self.log_ttd.len()
    }

    /// The `r` most relevant term ids of `topic` at `lambda`, best first.
    ///
    /// Equal relevance is broken by term id.
    pub fn top_terms(&self, topic: usize, lambda: f64, r: usize) -> Result<Vec<usize>> {
        let relevance: Vec<f64> = self.log_ttd[topic]
            .iter()
            .zip(&self.log_lift[topic])
            .map(|(lp, ll)| lambda * lp + (1.0 - lambda) * ll)
            .collect();
        if let Some(term) = relevance.iter().position(|v| !v.is_finite()) {
            return Err(PrepareError::numerical(format!(
                "relevance of term {term} in topic {topic} at lambda {lambda} is not finite"
            )));
        }

        let by_relevance =
            |a: &usize, b: &usize| relevance[*b].total_cmp(&relevance[*a]).then(a.cmp(b));
        let mut terms: Vec<usize> = (0..relevance.len()).collect();
        let r = r.min(terms.len());
        if r == 0 {
            return Ok(Vec::new());
        }
        if r < terms.len() {
            terms.select_nth_unstable_by(r - 1, by_relevance);
            terms.truncate(r);
        }
        terms.sort_unstable_by(by_relevance);
        Ok(terms)
    }
}

/// Top terms for every topic at every λ of one chunk, in chunk order.
fn sweep_chunk(tables: &RelevanceTables, r: usize, lambdas: &[f64]) -> Result<Vec<Vec<Vec<usize>>>> {
    lambdas
        .iter()
        .map(|&lambda| {
            (0..tables.n_topics())
                .map(|topic| tables.top_terms(topic, lambda, r))
                .collect()
        })
        .collect()
}

/// Threads worth spawning for `chunks` tasks: never more than there are
/// chunks, and at least one.
fn pool_threads(workers: usize, chunks: usize) -> usize {
    workers.min(chunks).max(1)
}

/// Sweep the λ grid on `workers` threads and return, per topic, the union
/// of its top terms in order of first appearance (λ ascending, then rank).
///
/// The grid is split into contiguous chunks, one per worker, and results
/// are merged in chunk order, so the output does not depend on `workers`.
pub fn relevance_sweep(
    tables: &RelevanceTables,
    r: usize,
    lambdas: &[f64],
    workers: usize,
) -> Result<Vec<Vec<usize>>> {
    let workers = workers.max(1);
    let chunk_size = lambdas.len().div_ceil(workers).max(1);
    let chunks: Vec<&[f64]> = lambdas.chunks(chunk_size).collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_threads(workers, chunks.len()))
        .build()
        .map_err(|e| PrepareError::internal(format!("failed to build thread pool: {e}")))?;

    let partials: Vec<Vec<Vec<Vec<usize>>>> = pool.install(|| {
        chunks
            .par_iter()
            .map(|chunk| sweep_chunk(tables, r, chunk))
            .collect::<Result<_>>()
    })?;

    let k = tables.n_topics();
    let mut seen: Vec<FxHashSet<usize>> = vec![FxHashSet::default(); k];
    let mut union: Vec<Vec<usize>> = vec![Vec::new(); k];
    for per_lambda in partials.into_iter().flatten() {
        for (topic, terms) in per_lambda.into_iter().enumerate() {
            for term in terms {
                if seen[topic].insert(term) {
                    union[topic].push(term);
                }
            }
        }
    }
    Ok(union)
}

// ============================================================================
// Topic-info table
// ============================================================================

/// Rows of one topic's view for the given term ids.
pub fn topic_rows(
    position: usize,
    category: &str,
    terms: &[usize],
    stats: &TermStatistics,
    tables: &RelevanceTables,
    vocab: &[String],
) -> Vec<TopicInfoRow> {
    terms
        .iter()
        .map(|&term| TopicInfoRow {
            term: vocab[term].clone(),
            freq: stats.term_topic_freq[position][term],
            total: stats.term_frequency[term],
            category: category.to_string(),
            logprob: round_to(tables.log_ttd[position][term], LOG_DECIMALS),
            loglift: round_to(tables.log_lift[position][term], LOG_DECIMALS),
            term_id: term,
        })
        .collect()
}

/// The full topic-info table: default view first, then each topic in
/// display order.
pub fn topic_info(
    ordering: &TopicOrdering,
    stats: &TermStatistics,
    vocab: &[String],
    r: usize,
    lambda_step: f64,
    workers: usize,
    start_index: usize,
) -> Result<Vec<TopicInfoRow>> {
    let tables = RelevanceTables::new(ordering, stats);
    let lambdas = lambda_grid(lambda_step)?;
    let per_topic = relevance_sweep(&tables, r, &lambdas, workers)?;

    tracing::debug!(
        lambdas = lambdas.len(),
        workers,
        "relevance sweep complete"
    );

    let mut rows = stats.default_view(vocab, r);
    for (position, terms) in per_topic.iter().enumerate() {
        let category =
            TopicInfoRow::topic_category(TopicOrdering::client_topic(position, start_index));
        rows.extend(topic_rows(position, &category, terms, stats, &tables, vocab));
    }
    Ok(rows)
}
