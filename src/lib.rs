//! Survey Tables - flatten nested survey submissions into relational tables
//!
//! Provides unified interfaces for:
//! - Schema construction from nested form descriptions
//! - Flattening submissions into one table per repeat group
//! - Table assembly, statistics and structure summaries
//! - Import of form-authoring content
//! - Export of flattened tables

pub mod export;
pub mod flatten;
pub mod import;
pub mod models;
pub mod schema;
pub mod tables;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use export::{ExportError, ExportFormat, ExportResult, TableSetExporter, sheet_names};
pub use flatten::{
    CollisionPolicy, FlattenConfig, FlattenEngine, FlattenError, TableLayout, ValidationError,
};
pub use import::{FormContentImporter, ImportError, ImportedForm};
pub use schema::{SchemaError, SchemaParser, load_form_description, parse_form};
pub use tables::{FlattenStats, StructureSummary, TableAssembler};

// Re-export models
pub use models::{
    FlatRow, FormDescription, GroupSpec, MAIN_TABLE, Question, QuestionSpec, RepeatGroup,
    SurveyStructure, Table, TableSet,
};
