//! Summary command implementation

use std::path::Path;

use crate::cli::error::CliError;
use crate::cli::output::format_summary;
use crate::flatten::TableLayout;
use crate::schema::load_structure;
use crate::tables::{StructureSummary, column_collisions};

/// Handle the `summary` command
pub fn handle_summary(form: &Path, json: bool) -> Result<(), CliError> {
    let structure = load_structure(form)?;
    let summary = StructureSummary::from_structure(&structure);

    if json {
        let output = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        println!("{}", output);
    } else {
        let layout = TableLayout::from_structure(&structure);
        print!("{}", format_summary(&summary, &column_collisions(&layout)));
    }
    Ok(())
}
