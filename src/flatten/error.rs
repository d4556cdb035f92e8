//! Error types for flattening

use thiserror::Error;

use crate::schema::SchemaError;

/// A submission whose shape disagrees with the schema
///
/// Raised only in strict mode; lenient mode drops or nulls the offending data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither `_id` nor `meta/instanceID` is present
    #[error("Submission {submission}: no submission id (_id or meta/instanceID)")]
    MissingSubmissionId { submission: usize },

    /// A repeat group key holds something other than an array
    #[error("Submission {submission}: expected an array at '{key}', found {found}")]
    ExpectedArray {
        submission: usize,
        key: String,
        found: &'static str,
    },

    /// A submission or repeat instance is not an object
    #[error("Submission {submission}: expected an object at {location}, found {found}")]
    ExpectedObject {
        submission: usize,
        location: String,
        found: &'static str,
    },

    /// A raw field matches no declared column of its table
    #[error("Submission {submission}: field '{field}' is not declared for table '{table}'")]
    UndeclaredField {
        submission: usize,
        table: String,
        field: String,
    },

    /// Two raw fields reduce to the same column of one row
    #[error(
        "Submission {submission}: field '{field}' collides with an earlier value for column '{column}' in table '{table}'"
    )]
    ColumnCollision {
        submission: usize,
        table: String,
        column: String,
        field: String,
    },
}

impl ValidationError {
    /// Index of the offending submission in the input batch
    pub fn submission(&self) -> usize {
        match self {
            ValidationError::MissingSubmissionId { submission }
            | ValidationError::ExpectedArray { submission, .. }
            | ValidationError::ExpectedObject { submission, .. }
            | ValidationError::UndeclaredField { submission, .. }
            | ValidationError::ColumnCollision { submission, .. } => *submission,
        }
    }
}

/// Errors returned by batch flattening
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The schema could not be built
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A submission failed validation; no tables are returned
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// JSON type name used in error messages
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
