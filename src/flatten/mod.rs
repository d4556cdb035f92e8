//! Flattening of nested submissions into relational tables
//!
//! Each submission yields one row in the root table and one row per repeat
//! instance in that group's table. Non-root rows carry synthetic linkage
//! columns back to the submission and to every enclosing repeat instance.
//!
//! ## Features
//!
//! - **Schema-driven columns** - every row carries exactly its table's declared columns
//! - **Arbitrary nesting** - repeat groups are walked recursively
//! - **Lenient or strict** - drop unexpected data or fail the batch
//! - **Parallel batches** - `flatten_parallel` with the `parallel` feature
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_tables::flatten::{FlattenConfig, FlattenEngine};
//!
//! let engine = FlattenEngine::with_config(structure, FlattenConfig::strict());
//! let tables = engine.flatten(&submissions)?;
//! for table in &tables {
//!     println!("{}: {} rows", table.name, table.len());
//! }
//! ```

mod config;
mod engine;
mod error;
mod layout;

pub use config::{CollisionPolicy, DEFAULT_IGNORED_FIELDS, FlattenConfig, FlattenConfigBuilder};
pub use engine::{FlattenEngine, SubmissionRows};
pub use error::{FlattenError, ValidationError};
pub use layout::{METADATA_COLUMNS, PARENT_ID_COLUMN, TableLayout, TableSpec};
