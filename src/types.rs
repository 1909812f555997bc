//! Core types for rapid_ldavis
//!
//! This module defines the configuration of a [`crate::prepare`] call and
//! the fixed constants inherited from the LDAvis data format.

use crate::errors::{PrepareError, Result};
use crate::projection::OrdinationMethod;
use serde::{Deserialize, Serialize};

// ============================================================================
// Display constants
// ============================================================================

/// Default number of terms shown per bar chart.
pub const DEFAULT_R: usize = 30;

/// Default distance between consecutive λ values of the relevance grid.
pub const DEFAULT_LAMBDA_STEP: f64 = 0.01;

/// Largest number of λ steps the relevance grid may hold (λ step ≥ 1e-5).
pub const MAX_LAMBDA_STEPS: usize = 100_000;

/// Token-table pairs with a smaller (rescaled) frequency are dropped.
///
/// Downstream front ends size highlight circles from this table and rely on
/// the exact cutoff, so it is not configurable.
pub const TOKEN_TABLE_MIN_FREQ: f64 = 0.5;

/// Decimals kept for `logprob` / `loglift` in topic rows.
pub const LOG_DECIMALS: i32 = 4;

/// The single cluster tag every topic carries.
pub const DEFAULT_CLUSTER: u32 = 1;

/// Round half to even at `decimals` places, as array libraries do.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

// ============================================================================
// Plot options
// ============================================================================

/// Axis labels for the topic map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub xlab: String,
    pub ylab: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            xlab: "PC1".to_string(),
            ylab: "PC2".to_string(),
        }
    }
}

impl PlotOptions {
    pub fn new(xlab: impl Into<String>, ylab: impl Into<String>) -> Self {
        Self {
            xlab: xlab.into(),
            ylab: ylab.into(),
        }
    }
}

// ============================================================================
// Parallelism
// ============================================================================

/// Resolve a worker count from a parallelism setting.
///
/// Positive values are taken literally. Negative values count back from
/// the number of cores: `-1` uses every core, `-2` leaves one free, and so
/// on (`cores + 1 + parallelism`, at least 1). Zero is rejected by
/// [`PrepareConfig::validate`] and resolves to 1 here.
pub fn resolve_workers(parallelism: i32, cores: usize) -> usize {
    if parallelism > 0 {
        parallelism as usize
    } else if parallelism < 0 {
        let n = cores as i64 + 1 + i64::from(parallelism);
        n.max(1) as usize
    } else {
        1
    }
}

/// Number of logical cores available to this process.
pub fn available_cores() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`crate::prepare`]
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Number of terms shown per bar chart (clamped to the vocabulary size)
    pub r: usize,
    /// Distance between λ values of the relevance grid, in (0, 1]
    pub lambda_step: f64,
    /// Strategy projecting topics into two dimensions
    pub ordination: OrdinationMethod,
    /// Worker count for the relevance sweep (negative counts back from cores)
    pub parallelism: i32,
    /// Axis labels passed through to the output
    pub plot_opts: PlotOptions,
    /// Sort topics by descending corpus share
    pub sort_topics: bool,
    /// Number given to the first topic in client-facing output
    pub start_index: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            r: DEFAULT_R,
            lambda_step: DEFAULT_LAMBDA_STEP,
            ordination: OrdinationMethod::default(),
            parallelism: -1,
            plot_opts: PlotOptions::default(),
            sort_topics: true,
            start_index: 1,
        }
    }
}

impl PrepareConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.r == 0 {
            return Err(PrepareError::invalid_config("R must be > 0"));
        }

        if !(self.lambda_step > 0.0 && self.lambda_step <= 1.0) {
            return Err(PrepareError::invalid_config(format!(
                "lambda_step must be in (0, 1], got {}",
                self.lambda_step
            )));
        }

        if 1.0 / self.lambda_step > MAX_LAMBDA_STEPS as f64 {
            return Err(PrepareError::invalid_config(format!(
                "lambda_step {} yields more than {MAX_LAMBDA_STEPS} grid steps",
                self.lambda_step
            )));
        }

        if self.parallelism == 0 {
            return Err(PrepareError::invalid_config(
                "parallelism must be non-zero (use -1 for all cores)",
            ));
        }

        Ok(())
    }

    /// Worker count for the relevance sweep on this machine.
    pub fn workers(&self) -> usize {
        resolve_workers(self.parallelism, available_cores())
    }

    /// Builder: set R
    pub fn with_r(mut self, r: usize) -> Self {
        self.r = r;
        self
    }

    /// Builder: set λ step
    pub fn with_lambda_step(mut self, step: f64) -> Self {
        self.lambda_step = step;
        self
    }

    /// Builder: set the ordination strategy
    pub fn with_ordination(mut self, ordination: OrdinationMethod) -> Self {
        self.ordination = ordination;
        self
    }

    /// Builder: select the ordination strategy by name.
    ///
    /// Unknown names fall back to PCoA with a warning.
    pub fn with_ordination_name(mut self, name: &str) -> Self {
        self.ordination = OrdinationMethod::from_name_or_default(name);
        self
    }

    /// Builder: set parallelism
    pub fn with_parallelism(mut self, parallelism: i32) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Builder: set plot options
    pub fn with_plot_opts(mut self, plot_opts: PlotOptions) -> Self {
        self.plot_opts = plot_opts;
        self
    }

    /// Builder: enable or disable topic sorting
    pub fn with_sort_topics(mut self, sort: bool) -> Self {
        self.sort_topics = sort;
        self
    }

    /// Builder: set the first client-facing topic number
    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }
}
