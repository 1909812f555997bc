//! Metric multidimensional scaling by stress majorization (SMACOF).
//!
//! Each run starts from a seeded uniform layout and applies the Guttman
//! transform until the normalized stress stops improving by more than
//! `eps`. The best of `n_init` runs wins.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::divergence::pairwise_jensen_shannon;
use super::Ordination;
use crate::errors::Result;

/// Floor applied to embedded distances before dividing by them.
const MIN_DISTANCE: f64 = 1e-5;

/// SMACOF parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricMdsOptions {
    pub n_init: usize,
    pub max_iter: usize,
    pub eps: f64,
    pub seed: u64,
}

impl Default for MetricMdsOptions {
    fn default() -> Self {
        Self {
            n_init: 4,
            max_iter: 300,
            eps: 1e-3,
            seed: 0,
        }
    }
}

/// JS divergence followed by metric MDS.
#[derive(Debug, Clone, Default)]
pub struct MetricMds {
    options: MetricMdsOptions,
}

impl MetricMds {
    pub fn new(options: MetricMdsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MetricMdsOptions {
        &self.options
    }
}

impl Ordination for MetricMds {
    fn name(&self) -> &str {
        "mmds"
    }

    fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        Ok(smacof(&pairwise_jensen_shannon(distributions), &self.options))
    }
}

fn euclidean(points: &[[f64; 2]]) -> Vec<Vec<f64>> {
    points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt())
                .collect()
        })
        .collect()
}

fn raw_stress(embedded: &[Vec<f64>], target: &[Vec<f64>]) -> f64 {
    embedded
        .iter()
        .zip(target)
        .flat_map(|(e, t)| e.iter().zip(t).map(|(a, b)| (a - b).powi(2)))
        .sum::<f64>()
        / 2.0
}

fn guttman_transform(
    x: &[[f64; 2]],
    embedded: &[Vec<f64>],
    target: &[Vec<f64>],
) -> Vec<[f64; 2]> {
    let n = x.len();
    let mut out = vec![[0.0; 2]; n];
    for i in 0..n {
        let mut diag: f64 = 0.0;
        for j in 0..n {
            if i == j {
                continue;
            }
            let ratio = target[i][j] / embedded[i][j].max(MIN_DISTANCE);
            diag += ratio;
            out[i][0] -= ratio * x[j][0];
            out[i][1] -= ratio * x[j][1];
        }
        out[i][0] += diag * x[i][0];
        out[i][1] += diag * x[i][1];
        out[i][0] /= n as f64;
        out[i][1] /= n as f64;
    }
    out
}

fn smacof_single(
    target: &[Vec<f64>],
    options: &MetricMdsOptions,
    rng: &mut ChaCha8Rng,
) -> (Vec<[f64; 2]>, f64) {
    let n = target.len();
    let mut x: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();
    let mut old_stress: Option<f64> = None;
    let mut stress = f64::INFINITY;

    for _ in 0..options.max_iter {
        let embedded = euclidean(&x);
        stress = raw_stress(&embedded, target);
        x = guttman_transform(&x, &embedded, target);

        let norm: f64 = x.iter().map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt()).sum();
        let normalized = if norm > 0.0 { stress / norm } else { 0.0 };
        if let Some(old) = old_stress {
            if old - normalized < options.eps {
                break;
            }
        }
        old_stress = Some(normalized);
    }
    (x, stress)
}

/// Embed a dissimilarity matrix in 2 dimensions with SMACOF.
///
/// Deterministic for a given seed.
pub fn smacof(dissimilarities: &[Vec<f64>], options: &MetricMdsOptions) -> Vec<[f64; 2]> {
    let n = dissimilarities.len();
    if n <= 1 {
        return vec![[0.0; 2]; n];
    }

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut best: Option<(Vec<[f64; 2]>, f64)> = None;
    for _ in 0..options.n_init.max(1) {
        let (x, stress) = smacof_single(dissimilarities, options, &mut rng);
        if best.as_ref().map_or(true, |(_, s)| stress < *s) {
            best = Some((x, stress));
        }
    }
    best.map(|(x, _)| x).unwrap_or_else(|| vec![[0.0; 2]; n])
}
