//! Principal coordinate analysis (classical multidimensional scaling).
//!
//! Given a K×K dissimilarity matrix D, double-center the squared
//! dissimilarities, `B = -½ H D² H` with `H = I - 11ᵀ/K`, and embed each
//! topic with the two leading eigenpairs of B.

use nalgebra::{DMatrix, SymmetricEigen};

use super::divergence::pairwise_jensen_shannon;
use super::Ordination;
use crate::errors::Result;

/// Eigenvalues at or below this magnitude are treated as zero.
pub const EIGEN_ZERO_TOL: f64 = 1e-8;

/// JS divergence followed by classical scaling. The default ordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalScaling;

impl Ordination for ClassicalScaling {
    fn name(&self) -> &str {
        "pcoa"
    }

    fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        Ok(pcoa(&pairwise_jensen_shannon(distributions)))
    }
}

/// Classical scaling of a symmetric dissimilarity matrix into 2 dimensions.
///
/// Negative and near-zero eigenvalues are clamped to zero along with their
/// eigenvectors, so a degenerate axis collapses to 0 rather than producing
/// NaN. Each eigenvector's sign is chosen so its largest-magnitude entry is
/// positive. With fewer than two topics the missing axes are zero.
pub fn pcoa(dissimilarities: &[Vec<f64>]) -> Vec<[f64; 2]> {
    let k = dissimilarities.len();
    if k == 0 {
        return Vec::new();
    }

    let d2 = DMatrix::from_fn(k, k, |i, j| dissimilarities[i][j].powi(2));
    let h = DMatrix::<f64>::identity(k, k) - DMatrix::from_element(k, k, 1.0 / k as f64);
    let b = (&h * d2 * &h) * -0.5;
    // Force exact symmetry before the symmetric solver.
    let b = (&b + b.transpose()) * 0.5;

    let eigen = SymmetricEigen::new(b);
    let mut idx: Vec<usize> = (0..k).collect();
    idx.sort_by(|&a, &c| eigen.eigenvalues[c].total_cmp(&eigen.eigenvalues[a]));

    let mut coords = vec![[0.0; 2]; k];
    for (axis, &col) in idx.iter().take(2).enumerate() {
        let lambda = eigen.eigenvalues[col];
        if lambda.abs() <= EIGEN_ZERO_TOL || lambda < 0.0 {
            continue;
        }
        let v = eigen.eigenvectors.column(col);
        let pivot = (0..k).fold(0, |best, i| if v[i].abs() > v[best].abs() { i } else { best });
        let sign = if v[pivot] < 0.0 { -1.0 } else { 1.0 };
        let scale = lambda.sqrt() * sign;
        for (i, point) in coords.iter_mut().enumerate() {
            point[axis] = scale * v[i];
        }
    }
    coords
}
