//! Divergences between discrete distributions.
//!
//! All logarithms are natural. Inputs are normalized to sum to 1 before use
//! and `0 · ln 0` is taken as 0.

fn normalized(p: &[f64]) -> Vec<f64> {
    let sum: f64 = p.iter().sum();
    if sum > 0.0 {
        p.iter().map(|v| v / sum).collect()
    } else {
        p.to_vec()
    }
}

fn kl_normalized(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(&pi, _)| pi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi).ln())
        .sum()
}

/// Kullback-Leibler divergence `KL(p ‖ q)`.
///
/// Infinite when `q` is zero somewhere `p` is not.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    kl_normalized(&normalized(p), &normalized(q))
}

/// Jensen-Shannon divergence, `½ KL(p ‖ m) + ½ KL(q ‖ m)` with `m = ½(p + q)`.
///
/// Symmetric, zero iff `p == q` after normalization, and at most `ln 2`.
pub fn jensen_shannon(p: &[f64], q: &[f64]) -> f64 {
    let p = normalized(p);
    let q = normalized(q);
    let m: Vec<f64> = p.iter().zip(&q).map(|(a, b)| 0.5 * (a + b)).collect();
    let js = 0.5 * (kl_normalized(&p, &m) + kl_normalized(&q, &m));
    // Rounding can leave tiny negatives for identical inputs.
    js.max(0.0)
}

/// Symmetric K×K matrix of pairwise JS divergences with a zero diagonal.
pub fn pairwise_jensen_shannon(distributions: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = distributions.len();
    let mut dist = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let d = jensen_shannon(&distributions[i], &distributions[j]);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_identical_is_zero() {
        let p = [0.2, 0.3, 0.5];
        assert_eq!(jensen_shannon(&p, &p), 0.0);
    }

    #[test]
    fn test_js_disjoint_is_ln2() {
        let js = jensen_shannon(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((js - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_js_symmetric_and_normalizes() {
        let p = [2.0, 1.0, 1.0];
        let q = [0.1, 0.1, 0.8];
        assert!((jensen_shannon(&p, &q) - jensen_shannon(&q, &p)).abs() < 1e-15);
        let pn = [0.5, 0.25, 0.25];
        assert!((jensen_shannon(&p, &q) - jensen_shannon(&pn, &q)).abs() < 1e-15);
    }

    #[test]
    fn test_kl_properties() {
        assert_eq!(kl_divergence(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
        assert!(kl_divergence(&[0.9, 0.1], &[0.5, 0.5]) > 0.0);
        assert!(kl_divergence(&[0.5, 0.5], &[1.0, 0.0]).is_infinite());
    }

    #[test]
    fn test_pairwise_matrix() {
        let d = pairwise_jensen_shannon(&[
            vec![0.7, 0.3],
            vec![0.3, 0.7],
            vec![0.5, 0.5],
        ]);
        assert_eq!(d.len(), 3);
        for i in 0..3 {
            assert_eq!(d[i][i], 0.0);
            for j in 0..3 {
                assert_eq!(d[i][j], d[j][i]);
            }
        }
        assert!(d[0][1] > d[0][2]);
    }
}
