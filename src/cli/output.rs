//! Output formatting for CLI

use std::path::Path;

use crate::cli::error::CliError;
use crate::tables::{ColumnCollision, FlattenStats, StructureSummary};

/// Format run statistics for stderr
pub fn format_stats(stats: &FlattenStats) -> String {
    let mut output = String::new();
    output.push_str("Flatten complete:\n");
    output.push_str(&format!(
        "  Submissions processed: {}\n",
        stats.submissions_processed
    ));
    if stats.submissions_skipped > 0 {
        output.push_str(&format!(
            "  Submissions skipped: {}\n",
            stats.submissions_skipped
        ));
    }
    if stats.fields_dropped > 0 {
        output.push_str(&format!("  Fields dropped: {}\n", stats.fields_dropped));
    }
    if stats.collisions > 0 {
        output.push_str(&format!("  Collided values: {}\n", stats.collisions));
    }
    for (table, rows) in &stats.rows_per_table {
        output.push_str(&format!("  {}: {} row(s)\n", table, rows));
    }
    output
}

/// Format a structure summary for stdout
pub fn format_summary(summary: &StructureSummary, collisions: &[ColumnCollision]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Questions: {}\n", summary.total_questions));

    output.push_str(&format!("Repeat groups: {}\n", summary.repeat_groups.len()));
    for group in &summary.repeat_groups {
        output.push_str(&format!("  - {}\n", group));
    }

    output.push_str(&format!("Question types: {}\n", summary.question_types.join(", ")));

    output.push_str("Questions by path:\n");
    for (path, names) in &summary.questions_by_path {
        let path = if path.is_empty() { "(root)" } else { path.as_str() };
        output.push_str(&format!("  {}: {}\n", path, names.join(", ")));
    }

    if !collisions.is_empty() {
        output.push_str("\n⚠️  Column collisions:\n");
        for collision in collisions {
            output.push_str(&format!(
                "  - {}.{} <- {}\n",
                collision.table,
                collision.column,
                collision.questions.join(", ")
            ));
        }
    }

    output
}

/// Write to a file, or to stdout when no path is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
