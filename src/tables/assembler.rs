//! Table assembly
//!
//! Concatenates per-submission rows into the final tables, in submission order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::flatten::{SubmissionRows, TableLayout};
use crate::models::{FlatRow, Table, TableSet};

/// Statistics from one flatten run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenStats {
    /// Submissions that produced a root row
    pub submissions_processed: usize,
    /// Submissions skipped as malformed
    pub submissions_skipped: usize,
    /// Raw fields dropped for lack of a declared column
    pub fields_dropped: usize,
    /// Values discarded by the collision policy
    pub collisions: usize,
    /// Row count per table key
    pub rows_per_table: IndexMap<String, usize>,
}

/// Accumulates submission rows into tables following a layout
pub struct TableAssembler<'a> {
    layout: &'a TableLayout,
    rows: Vec<Vec<FlatRow>>,
    stats: FlattenStats,
}

impl<'a> TableAssembler<'a> {
    /// Create an assembler with one empty table per layout entry
    pub fn new(layout: &'a TableLayout) -> Self {
        Self {
            layout,
            rows: vec![Vec::new(); layout.len()],
            stats: FlattenStats::default(),
        }
    }

    /// Append the rows of the next submission
    pub fn push(&mut self, part: SubmissionRows) {
        if part.skipped {
            self.stats.submissions_skipped += 1;
        } else {
            self.stats.submissions_processed += 1;
        }
        self.stats.fields_dropped += part.dropped_fields;
        self.stats.collisions += part.collisions;

        for (table, rows) in self.rows.iter_mut().zip(part.rows) {
            table.extend(rows);
        }
    }

    /// Append partial results produced out of order, restoring input order first
    pub fn merge_indexed(&mut self, mut parts: Vec<(usize, SubmissionRows)>) {
        parts.sort_by_key(|(index, _)| *index);
        for (_, part) in parts {
            self.push(part);
        }
    }

    /// Build the ordered table set
    pub fn finish(self) -> (TableSet, FlattenStats) {
        let mut stats = self.stats;
        let tables = self
            .layout
            .tables()
            .iter()
            .zip(self.rows)
            .map(|(spec, rows)| {
                stats.rows_per_table.insert(spec.name.clone(), rows.len());
                Table {
                    name: spec.name.clone(),
                    label: spec.label.clone(),
                    group: spec.group.clone(),
                    level: spec.level,
                    sequence: spec.sequence,
                    columns: spec.columns.clone(),
                    rows,
                }
            })
            .collect();

        (TableSet::new(tables), stats)
    }
}
