//! JSON interface
//!
//! Passing one JSON string across the boundary avoids converting large
//! nested lists element by element.

use crate::json::JsonDocument;
use crate::pipeline::input::ModelData;
use crate::pipeline::validation::ValidationEngine;
use pyo3::prelude::*;

use super::native::{to_py_err, PyPreparedData};

/// Prepare a model document and return the LDAvis JSON.
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn prepare_from_json(py: Python<'_>, json_input: &str) -> PyResult<String> {
    let doc = JsonDocument::from_json(json_input).map_err(to_py_err)?;
    py.allow_threads(|| doc.prepare().and_then(|data| data.to_json()))
        .map_err(to_py_err)
}

/// Prepare a model document and return a `PreparedData` object.
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn prepare_document(py: Python<'_>, json_input: &str) -> PyResult<PyPreparedData> {
    let doc = JsonDocument::from_json(json_input).map_err(to_py_err)?;
    let data = py.allow_threads(|| doc.prepare()).map_err(to_py_err)?;
    Ok(data.into())
}

/// Validate a model document without preparing it.
///
/// Returns the validation report as JSON:
/// `{"valid": bool, "diagnostics": [...]}`.
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn validate_model(json_input: &str) -> PyResult<String> {
    let doc = JsonDocument::from_json(json_input).map_err(to_py_err)?;
    let model = doc.model;
    let data = ModelData::normalize(
        model.phi,
        model.theta,
        model.doc_length,
        model.vocab,
        model.term_frequency,
    );
    let report = ValidationEngine::with_defaults().validate(&data);
    let value = serde_json::json!({
        "valid": report.is_valid(),
        "diagnostics": report.diagnostics,
    });
    Ok(value.to_string())
}
