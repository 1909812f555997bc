//! Exact t-distributed stochastic neighbor embedding.
//!
//! Topic counts are small, so the O(K²) exact gradient is used throughout.
//! Affinities are calibrated per topic by binary search on the Gaussian
//! precision until the conditional distribution reaches the target
//! perplexity.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::divergence::pairwise_jensen_shannon;
use super::Ordination;
use crate::errors::{PrepareError, Result};

const MACHINE_EPSILON: f64 = f64::EPSILON;
const PERPLEXITY_TOL: f64 = 1e-5;
const PERPLEXITY_STEPS: usize = 100;
const MIN_GAIN: f64 = 0.01;
const INIT_STD: f64 = 1e-4;

/// t-SNE parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TsneOptions {
    /// Effective number of neighbours; clamped below the topic count.
    pub perplexity: f64,
    pub early_exaggeration: f64,
    /// Iterations run with exaggerated affinities and low momentum.
    pub exaggeration_iters: usize,
    /// Total iterations.
    pub n_iter: usize,
    /// Step size; `None` picks `max(K / exaggeration / 4, 50)`.
    pub learning_rate: Option<f64>,
    pub seed: u64,
}

impl Default for TsneOptions {
    fn default() -> Self {
        Self {
            perplexity: 30.0,
            early_exaggeration: 12.0,
            exaggeration_iters: 250,
            n_iter: 1000,
            learning_rate: None,
            seed: 0,
        }
    }
}

/// JS divergence followed by exact t-SNE.
#[derive(Debug, Clone, Default)]
pub struct Tsne {
    options: TsneOptions,
}

impl Tsne {
    pub fn new(options: TsneOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TsneOptions {
        &self.options
    }
}

impl Ordination for Tsne {
    fn name(&self) -> &str {
        "tsne"
    }

    fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        tsne(&pairwise_jensen_shannon(distributions), &self.options)
    }
}

/// Conditional affinities of one row at the precision matching `perplexity`.
fn conditional_row(distances: &[f64], skip: usize, perplexity: f64) -> Vec<f64> {
    let desired_entropy = perplexity.ln();
    let mut beta: f64 = 1.0;
    let mut beta_min = f64::NEG_INFINITY;
    let mut beta_max = f64::INFINITY;
    let mut row = vec![0.0; distances.len()];

    for _ in 0..PERPLEXITY_STEPS {
        let mut sum_p: f64 = 0.0;
        for (j, (&d, p)) in distances.iter().zip(row.iter_mut()).enumerate() {
            *p = if j == skip { 0.0 } else { (-d * beta).exp() };
            sum_p += *p;
        }
        let sum_p = sum_p.max(1e-8);
        let mut weighted: f64 = 0.0;
        for (&d, p) in distances.iter().zip(row.iter_mut()) {
            *p /= sum_p;
            weighted += d * *p;
        }

        let diff = sum_p.ln() + beta * weighted - desired_entropy;
        if diff.abs() <= PERPLEXITY_TOL {
            break;
        }
        if diff > 0.0 {
            beta_min = beta;
            beta = if beta_max.is_infinite() { beta * 2.0 } else { (beta + beta_max) / 2.0 };
        } else {
            beta_max = beta;
            beta = if beta_min.is_infinite() { beta / 2.0 } else { (beta + beta_min) / 2.0 };
        }
    }
    row
}

/// Symmetrized joint affinities.
fn joint_probabilities(distances: &[Vec<f64>], perplexity: f64) -> Vec<Vec<f64>> {
    let n = distances.len();
    let conditional: Vec<Vec<f64>> = distances
        .iter()
        .enumerate()
        .map(|(i, row)| conditional_row(row, i, perplexity))
        .collect();

    let mut p = vec![vec![0.0; n]; n];
    let mut total: f64 = 0.0;
    for i in 0..n {
        for j in 0..n {
            p[i][j] = conditional[i][j] + conditional[j][i];
            total += p[i][j];
        }
    }
    let total = total.max(MACHINE_EPSILON);
    for (i, row) in p.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = if i == j { 0.0 } else { (*v / total).max(MACHINE_EPSILON) };
        }
    }
    p
}

/// Exact gradient of KL(P ‖ Q) with respect to the embedding.
fn gradient(p: &[Vec<f64>], y: &[[f64; 2]], exaggeration: f64) -> Vec<[f64; 2]> {
    let n = y.len();
    let mut num = vec![vec![0.0; n]; n];
    let mut sum_num: f64 = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let d2 = (y[i][0] - y[j][0]).powi(2) + (y[i][1] - y[j][1]).powi(2);
            let v = 1.0 / (1.0 + d2);
            num[i][j] = v;
            num[j][i] = v;
            sum_num += 2.0 * v;
        }
    }
    let sum_num = sum_num.max(MACHINE_EPSILON);

    let mut grad = vec![[0.0; 2]; n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let q = (num[i][j] / sum_num).max(MACHINE_EPSILON);
            let coeff = 4.0 * (exaggeration * p[i][j] - q) * num[i][j];
            grad[i][0] += coeff * (y[i][0] - y[j][0]);
            grad[i][1] += coeff * (y[i][1] - y[j][1]);
        }
    }
    grad
}

/// Embed a dissimilarity matrix in 2 dimensions with exact t-SNE.
///
/// Deterministic for a given seed. Fewer than two points land at the origin.
pub fn tsne(distances: &[Vec<f64>], options: &TsneOptions) -> Result<Vec<[f64; 2]>> {
    let n = distances.len();
    if n <= 1 {
        return Ok(vec![[0.0; 2]; n]);
    }

    let perplexity = options.perplexity.min((n - 1) as f64).max(1.0);
    let p = joint_probabilities(distances, perplexity);

    let normal = Normal::new(0.0, INIT_STD)
        .map_err(|e| PrepareError::internal(format!("t-SNE initialization: {e}")))?;
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut y: Vec<[f64; 2]> = (0..n)
        .map(|_| [normal.sample(&mut rng), normal.sample(&mut rng)])
        .collect();

    let learning_rate = options
        .learning_rate
        .unwrap_or_else(|| (n as f64 / options.early_exaggeration / 4.0).max(50.0));
    let mut update = vec![[0.0f64; 2]; n];
    let mut gains = vec![[1.0f64; 2]; n];

    for iter in 0..options.n_iter {
        let early = iter < options.exaggeration_iters;
        let (exaggeration, momentum) = if early {
            (options.early_exaggeration, 0.5)
        } else {
            (1.0, 0.8)
        };

        let grad = gradient(&p, &y, exaggeration);
        for i in 0..n {
            for a in 0..2 {
                let flipped = update[i][a] * grad[i][a] < 0.0;
                gains[i][a] = if flipped { gains[i][a] + 0.2 } else { gains[i][a] * 0.8 };
                gains[i][a] = gains[i][a].max(MIN_GAIN);
                update[i][a] = momentum * update[i][a] - learning_rate * gains[i][a] * grad[i][a];
                y[i][a] += update[i][a];
            }
        }
    }
    Ok(y)
}
