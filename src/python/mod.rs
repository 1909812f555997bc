//! Python bindings via PyO3
//!
//! This module provides the Python interface for rapid_ldavis.

pub mod json;
pub mod native;

use pyo3::prelude::*;

/// Register all Python classes and functions
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Native interface
    m.add_class::<native::PyTopicInfoRow>()?;
    m.add_class::<native::PyPreparedData>()?;
    m.add_function(wrap_pyfunction!(native::prepare, m)?)?;

    // JSON interface
    m.add_function(wrap_pyfunction!(json::prepare_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(json::prepare_document, m)?)?;
    m.add_function(wrap_pyfunction!(json::validate_model, m)?)?;

    Ok(())
}
