//! Loading form descriptions from disk
//!
//! A missing or malformed file is reported as [`SchemaError::Unavailable`];
//! callers decide what to do without a schema.

use std::path::Path;

use tracing::debug;

use super::error::SchemaError;
use super::parser::parse_form;
use crate::models::{FormDescription, SurveyStructure};

/// Read a form description from a JSON or YAML file (chosen by extension)
pub fn load_form_description(path: &Path) -> Result<FormDescription, SchemaError> {
    let unavailable = |reason: String| SchemaError::Unavailable {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    debug!(path = %path.display(), bytes = content.len(), "Loaded form description");

    parse_form_description(&content, is_yaml(path)).map_err(unavailable)
}

/// Read and parse a form description file into a survey structure
pub fn load_structure(path: &Path) -> Result<SurveyStructure, SchemaError> {
    let form = load_form_description(path)?;
    parse_form(&form)
}

/// Parse form description text
pub fn parse_form_description(content: &str, yaml: bool) -> Result<FormDescription, String> {
    if yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
