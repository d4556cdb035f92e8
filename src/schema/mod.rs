//! Schema construction
//!
//! Turns a nested form description into a [`SurveyStructure`](crate::models::SurveyStructure):
//! a flat index of questions and repeat groups with computed paths and levels.
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_tables::schema::{parse_form, load_form_description};
//!
//! let form = load_form_description(Path::new("form.json"))?;
//! let structure = parse_form(&form)?;
//! for group in structure.get_repeat_groups_sorted_by_level() {
//!     println!("{} (level {})", group.name, group.level);
//! }
//! ```

mod error;
mod loader;
mod parser;

pub use error::SchemaError;
pub use loader::{load_form_description, load_structure, parse_form_description};
pub use parser::{SchemaParser, parse_form};
