//! Models module
//!
//! Defines the survey schema (questions, repeat groups, the structure that
//! indexes them), the nested form description it is parsed from, and the flat
//! tables produced from submissions.

pub mod form;
pub mod question;
pub mod repeat_group;
pub mod structure;
pub mod table;

pub use form::{FormDescription, GroupSpec, QuestionSpec};
pub use question::Question;
pub use repeat_group::RepeatGroup;
pub use structure::{MAIN_TABLE, PARENT_ID_COLUMN, StructureParts, SurveyStructure};
pub use table::{FlatRow, Table, TableSet};
