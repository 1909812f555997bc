//! # rapid_ldavis
//!
//! Prepares fitted topic models for LDAvis-style interactive visualization.
//!
//! Given a model's topic-term and doc-topic distributions, document lengths,
//! vocabulary and term frequencies, [`prepare`] computes everything an
//! LDAvis front end draws:
//!
//! - a 2-D map of topics, placed by Jensen-Shannon divergence
//! - the most salient terms of the corpus
//! - the most relevant terms of each topic across the λ slider
//! - each term's distribution over topics
//!
//! ## Features
//!
//! - **Aggregated validation**: every input problem is reported at once
//! - **Parallel**: the relevance sweep runs on a scoped rayon pool
//! - **Deterministic**: identical input gives identical output, whatever the
//!   thread count
//! - **Python bindings**: optional, via PyO3 (`python` feature)

pub mod errors;
pub mod json;
pub mod pipeline;
pub mod prepared;
pub mod projection;
pub mod types;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use errors::{PrepareError, Result};
pub use types::{PlotOptions, PrepareConfig};

// Re-export main functionality
pub use json::{prepare_from_json, prepare_from_json_file, JsonConfig, JsonDocument, ModelInput};
pub use pipeline::error_code::ErrorCode;
pub use pipeline::errors::InputError;
pub use pipeline::input::{LabeledMatrix, LabeledSeries, MatrixInput, SeriesInput};
pub use pipeline::runner::{prepare, prepare_model};
pub use pipeline::validation::{ValidationEngine, ValidationReport};
pub use prepared::{PreparedData, PreparedDict, TokenTableRow, TopicCoordinate, TopicInfoRow};
pub use projection::{Ordination, OrdinationMethod};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Initialize the Python module
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register_module(m)?;
    Ok(())
}
