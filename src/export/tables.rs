//! JSON / YAML export of flattened tables

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::{ExportError, ExportResult};
use crate::models::{FlatRow, TableSet};

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// What a downstream tabular writer needs per table
#[derive(Serialize)]
struct ExportedTable<'a> {
    name: &'a str,
    label: &'a str,
    columns: &'a [String],
    rows: &'a [FlatRow],
}

/// Serializes a [`TableSet`] as an ordered list of `{name, label, columns, rows}`
#[derive(Debug, Default)]
pub struct TableSetExporter {
    format: ExportFormat,
}

impl TableSetExporter {
    /// Create an exporter for the given format
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Serialize the tables
    pub fn export(&self, tables: &TableSet) -> Result<ExportResult, ExportError> {
        let document: Vec<ExportedTable<'_>> = tables
            .iter()
            .map(|t| ExportedTable {
                name: &t.name,
                label: &t.label,
                columns: &t.columns,
                rows: &t.rows,
            })
            .collect();

        let content = match self.format {
            ExportFormat::Json => serde_json::to_string_pretty(&document)?,
            ExportFormat::Yaml => serde_yaml::to_string(&document)?,
        };

        Ok(ExportResult {
            content,
            format: self.format.to_string(),
        })
    }

    /// Serialize the tables into a file
    pub fn export_to_file(&self, tables: &TableSet, path: &Path) -> Result<(), ExportError> {
        let result = self.export(tables)?;
        std::fs::write(path, &result.content)?;
        debug!(path = %path.display(), format = %result.format, tables = tables.len(), "Exported tables");
        Ok(())
    }
}
