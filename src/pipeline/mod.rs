//! The prepare pipeline: input handling, validation and term statistics.
//!
//! ## Submodules
//!
//! - [`input`]: accepted input forms and their normalized tables
//! - [`validation`]: rule engine reporting every input problem at once
//! - [`error_code`] / [`errors`]: stable codes and diagnostics
//! - [`reorder`]: topic mass and display order
//! - [`term_stats`]: saliency, relevance sweep, topic-info table
//! - [`token_table`]: per-term topic shares
//! - [`runner`]: stage orchestration

pub mod error_code;
pub mod errors;
pub mod input;
pub mod reorder;
pub mod runner;
pub mod term_stats;
pub mod token_table;
pub mod validation;

pub use error_code::ErrorCode;
pub use errors::InputError;
pub use input::{
    DistTable, LabeledMatrix, LabeledSeries, MatrixInput, ModelData, Series, SeriesInput,
};
pub use reorder::{reorder_topics, TopicOrdering};
pub use runner::{prepare, prepare_model};
pub use term_stats::{lambda_grid, RelevanceTables, TermStatistics};
pub use validation::{
    Severity, ValidationDiagnostic, ValidationEngine, ValidationReport, ValidationRule,
};
