//! CLI error types

use std::path::PathBuf;

use crate::export::ExportError;
use crate::flatten::FlattenError;
use crate::import::ImportError;
use crate::schema::SchemaError;

/// Errors surfaced by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid config: {0}")]
    ConfigError(String),
    #[error("Invalid submissions: {0}")]
    SubmissionsError(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Flatten(#[from] FlattenError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl CliError {
    /// Message with a hint on how to fix the problem
    pub fn user_message(&self) -> String {
        match self {
            CliError::FileReadError(path, _) => {
                format!("{}\nCheck that '{}' exists and is readable.", self, path.display())
            }
            CliError::ConfigError(_) => format!(
                "{}\nConfig keys are 'strict', 'collisionPolicy' and 'ignoreFields'.",
                self
            ),
            CliError::SubmissionsError(_) => format!(
                "{}\nSubmissions must be a JSON array, a single object, or an object with a 'results' array.",
                self
            ),
            CliError::Schema(err) => err.user_message(),
            CliError::Flatten(FlattenError::Schema(err)) => err.user_message(),
            CliError::Flatten(FlattenError::Validation(err)) => format!(
                "{}\nRun without --strict to drop mismatched data instead.",
                err
            ),
            _ => self.to_string(),
        }
    }
}
