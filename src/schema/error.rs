//! Error types for schema construction

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a survey structure
///
/// A bad schema invalidates every submission processed against it, so all of
/// these are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A node name is empty, blank or contains a path separator
    #[error("Invalid node name: '{0}'")]
    InvalidName(String),

    /// Two nodes resolve to the same fully-qualified name
    #[error("Duplicate fully-qualified name: {0}")]
    DuplicateName(String),

    /// A repeat group's simple name cannot serve as a table key
    #[error("Repeat group '{0}' has an ambiguous or reserved table name")]
    AmbiguousGroupName(String),

    /// A node's path does not name a declared group
    #[error("Unresolved path '{path}' for '{name}'")]
    UnresolvedPath { name: String, path: String },

    /// A repeat group's level disagrees with its repeat ancestry
    #[error("Repeat group '{name}' declares level {declared}, expected {expected}")]
    InconsistentLevel {
        name: String,
        declared: usize,
        expected: usize,
    },

    /// A question inside a repeat group is named like one of its linkage columns
    #[error("Question '{name}' uses the reserved linkage column '{column}'")]
    ReservedColumn { name: String, column: String },

    /// The schema source could not be read or parsed
    #[error("Schema unavailable from {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },
}

impl SchemaError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SchemaError::Unavailable { path, reason } => format!(
                "Could not load form description from {}\nReason: {reason}\n\n\
                Hint: Check that the file exists and contains a valid JSON or YAML form description.",
                path.display()
            ),
            SchemaError::AmbiguousGroupName(name) => format!(
                "Repeat group '{name}' cannot be used as a table name.\n\n\
                Hint: Repeat group names must be unique across the form and must not be 'main'."
            ),
            SchemaError::ReservedColumn { name, column } => format!(
                "Question '{name}' would overwrite the linkage column '{column}'.\n\n\
                Hint: Rename the question; '_parent_id' and '_<group>_id' are generated for repeat tables."
            ),
            _ => self.to_string(),
        }
    }
}
