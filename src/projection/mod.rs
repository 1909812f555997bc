//! Topic projection into two dimensions.
//!
//! Topics are compared by the Jensen-Shannon divergence of their term
//! distributions ([`divergence`]); an ordination strategy then places them
//! on a plane so that similar topics land close together.
//!
//! ## Strategies
//!
//! | Name   | Type                       | Notes |
//! |--------|----------------------------|-------|
//! | `pcoa` | [`pcoa::ClassicalScaling`] | default, exact |
//! | `mmds` | [`smacof::MetricMds`]      | stress majorization, seeded |
//! | `tsne` | [`tsne::Tsne`]             | exact t-SNE, seeded |
//!
//! Callers can plug in their own [`Ordination`] through
//! [`OrdinationMethod::Custom`].

pub mod divergence;
pub mod pcoa;
pub mod smacof;
pub mod tsne;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{PrepareError, Result};

pub use divergence::{jensen_shannon, kl_divergence, pairwise_jensen_shannon};
pub use pcoa::ClassicalScaling;
pub use smacof::{MetricMds, MetricMdsOptions};
pub use tsne::{Tsne, TsneOptions};

// ============================================================================
// Ordination trait
// ============================================================================

/// Maps K distributions to K points in the plane.
///
/// Implementations receive the topic-term rows in display order and must
/// return exactly one finite `[x, y]` per row.
pub trait Ordination: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Project the distributions.
    fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>>;
}

// ============================================================================
// Strategy selector
// ============================================================================

/// The ordination used by [`crate::prepare`].
#[derive(Clone, Default)]
pub enum OrdinationMethod {
    /// Classical multidimensional scaling on JS divergences.
    #[default]
    Pcoa,
    /// Metric MDS (SMACOF) on JS divergences.
    MetricMds(MetricMdsOptions),
    /// Exact t-SNE on JS divergences.
    Tsne(TsneOptions),
    /// A caller-provided strategy.
    Custom(Arc<dyn Ordination>),
}

impl fmt::Debug for OrdinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcoa => f.write_str("Pcoa"),
            Self::MetricMds(opts) => f.debug_tuple("MetricMds").field(opts).finish(),
            Self::Tsne(opts) => f.debug_tuple("Tsne").field(opts).finish(),
            Self::Custom(ord) => f.debug_tuple("Custom").field(&ord.name()).finish(),
        }
    }
}

impl OrdinationMethod {
    /// Wrap a caller strategy.
    pub fn custom(ordination: impl Ordination + 'static) -> Self {
        Self::Custom(Arc::new(ordination))
    }

    /// Name of the selected strategy.
    pub fn name(&self) -> &str {
        match self {
            Self::Pcoa => "pcoa",
            Self::MetricMds(_) => "mmds",
            Self::Tsne(_) => "tsne",
            Self::Custom(ord) => ord.name(),
        }
    }

    /// Parse a strategy name, falling back to PCoA when it is unknown.
    ///
    /// The fallback is logged at warn level.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: PrepareError| {
            tracing::warn!(error = %err, "falling back to PCoA");
            Self::Pcoa
        })
    }

    /// Run the strategy and check the shape of its output.
    pub fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        let coords = match self {
            Self::Pcoa => ClassicalScaling.project(distributions)?,
            Self::MetricMds(opts) => MetricMds::new(opts.clone()).project(distributions)?,
            Self::Tsne(opts) => Tsne::new(opts.clone()).project(distributions)?,
            Self::Custom(ord) => ord.project(distributions)?,
        };
        check_coordinates(self.name(), &coords, distributions.len())?;
        Ok(coords)
    }
}

impl FromStr for OrdinationMethod {
    type Err = PrepareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pcoa" => Ok(Self::Pcoa),
            "mmds" => Ok(Self::MetricMds(MetricMdsOptions::default())),
            "tsne" => Ok(Self::Tsne(TsneOptions::default())),
            _ => Err(PrepareError::configuration(format!(
                "Unknown mds '{s}'; expected one of: pcoa, mmds, tsne"
            ))),
        }
    }
}

/// Reject output that is not one finite point per topic.
fn check_coordinates(name: &str, coords: &[[f64; 2]], expected: usize) -> Result<()> {
    if coords.len() != expected {
        return Err(PrepareError::projection(format!(
            "ordination '{name}' returned {} points for {expected} topics",
            coords.len()
        )));
    }
    if let Some(i) = coords
        .iter()
        .position(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return Err(PrepareError::projection(format!(
            "ordination '{name}' returned a non-finite coordinate for topic {i}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Diagonal;

    impl Ordination for Diagonal {
        fn name(&self) -> &str {
            "diagonal"
        }

        fn project(&self, distributions: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
            Ok((0..distributions.len())
                .map(|i| [i as f64, i as f64])
                .collect())
        }
    }

    struct Short;

    impl Ordination for Short {
        fn name(&self) -> &str {
            "short"
        }

        fn project(&self, _: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
            Ok(vec![[0.0, 0.0]])
        }
    }

    fn dists() -> Vec<Vec<f64>> {
        vec![
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.2, 0.7],
            vec![0.3, 0.4, 0.3],
        ]
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("pcoa".parse::<OrdinationMethod>().unwrap().name(), "pcoa");
        assert_eq!(" MMDS ".parse::<OrdinationMethod>().unwrap().name(), "mmds");
        assert_eq!("tsne".parse::<OrdinationMethod>().unwrap().name(), "tsne");
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "umap".parse::<OrdinationMethod>().unwrap_err();
        assert!(matches!(err, PrepareError::Configuration { .. }));
        assert!(err.to_string().contains("umap"));
        assert_eq!(OrdinationMethod::from_name_or_default("umap").name(), "pcoa");
    }

    #[test]
    fn test_custom_strategy() {
        let method = OrdinationMethod::custom(Diagonal);
        assert_eq!(method.name(), "diagonal");
        let coords = method.project(&dists()).unwrap();
        assert_eq!(coords, vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert!(format!("{method:?}").contains("diagonal"));
    }

    #[test]
    fn test_custom_wrong_shape_rejected() {
        let err = OrdinationMethod::custom(Short).project(&dists()).unwrap_err();
        assert!(matches!(err, PrepareError::Projection { .. }));
    }

    #[test]
    fn test_builtins_return_one_point_per_topic() {
        for method in [
            OrdinationMethod::Pcoa,
            OrdinationMethod::MetricMds(MetricMdsOptions::default()),
            OrdinationMethod::Tsne(TsneOptions::default()),
        ] {
            let coords = method.project(&dists()).unwrap();
            assert_eq!(coords.len(), 3, "{}", method.name());
        }
    }
}
