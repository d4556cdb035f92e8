//! Export functionality
//!
//! Provides exporters for flattened tables:
//! - JSON and YAML documents (ordered list of tables)
//! - Sheet names for workbook writers

pub mod sheets;
pub mod tables;

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ExportError {
    fn from(err: serde_yaml::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

pub use sheets::{MAX_SHEET_NAME_LEN, safe_sheet_name, sheet_names};
pub use tables::{ExportFormat, TableSetExporter};
