//! Import functionality
//!
//! Provides converters from form-authoring formats into the nested form
//! description consumed by the schema parser:
//! - Form content (flat survey rows with group markers, plus choice lists)

pub mod form_content;

pub use form_content::{Choice, ChoiceLists, FormContentImporter, ImportedForm};

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid content: {0}")]
    InvalidContent(String),
    #[error("Group at row {row} has no name")]
    UnnamedGroup { row: usize },
    #[error("End marker at row {row} closes no open group")]
    UnbalancedEnd { row: usize },
    #[error("Group '{name}' opened at row {row} is never closed")]
    UnclosedGroup { name: String, row: usize },
    #[error("Duplicate name in one group: {0}")]
    DuplicateName(String),
}
