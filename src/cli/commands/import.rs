//! Import command implementation

use std::path::Path;

use serde_json::Value;

use super::load_input;
use crate::cli::error::CliError;
use crate::cli::output::write_output;
use crate::import::{FormContentImporter, ImportError};

/// Handle the `import` command
///
/// Accepts either a bare content document or an asset wrapping it under
/// `content`, and writes the nested form description as JSON.
pub fn handle_import(content: &str, output: Option<&Path>) -> Result<(), CliError> {
    let document: Value = serde_json::from_str(&load_input(content)?)
        .map_err(|e| CliError::Import(ImportError::ParseError(e)))?;

    let importer = FormContentImporter::new();
    let imported = if document.get("content").is_some() {
        importer.import_asset(&document)?
    } else {
        importer.import(&document)?
    };

    eprintln!(
        "Imported {} question(s), {} group(s), {} choice list(s)",
        imported.form.questions.len(),
        imported.form.groups.len(),
        imported.choices.len()
    );

    let rendered = serde_json::to_string_pretty(&imported.form)
        .map_err(|e| CliError::Import(ImportError::ParseError(e)))?;
    write_output(&rendered, output)
}
