//! Flatten engine
//!
//! Maps each nested submission onto the tables of a [`TableLayout`]. The walk
//! over repeat groups is recursive, so nesting depth is bounded only by the
//! schema. Instance ids are positional: the element at 0-based index `i` of a
//! level-0 array gets `"{submissionId}_{i+1}"`, and element `j` nested inside
//! it gets `"{parentInstanceId}_{j+1}"`.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::config::{CollisionPolicy, FlattenConfig};
use super::error::{FlattenError, ValidationError, value_type_name};
use super::layout::{PARENT_ID_COLUMN, TableLayout, TableSpec};
use crate::models::question::last_segment;
use crate::models::{FlatRow, FormDescription, SurveyStructure, TableSet};
use crate::schema::parse_form;
use crate::tables::{FlattenStats, TableAssembler};

/// Rows produced from one submission, one list per table of the layout
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRows {
    /// Position of the submission in the input batch
    pub index: usize,
    /// Whether the submission was skipped as malformed (lenient mode)
    pub skipped: bool,
    /// Raw fields dropped because no column declares them
    pub dropped_fields: usize,
    /// Values discarded by the collision policy
    pub collisions: usize,
    /// Rows per table, indexed like the layout
    pub rows: Vec<Vec<FlatRow>>,
}

impl SubmissionRows {
    fn new(index: usize, tables: usize) -> Self {
        Self {
            index,
            skipped: false,
            dropped_fields: 0,
            collisions: 0,
            rows: vec![Vec::new(); tables],
        }
    }
}

/// Linkage values shared by every row below one repeat instance
struct Lineage<'a> {
    submission: usize,
    submission_id: &'a Value,
    submission_key: &'a str,
    ancestors: Vec<(String, String)>,
}

/// Flattens submissions against a fixed survey structure
///
/// The structure and layout are immutable after construction, so one engine can
/// serve any number of batches and threads.
#[derive(Debug, Clone)]
pub struct FlattenEngine {
    structure: Arc<SurveyStructure>,
    layout: TableLayout,
    config: FlattenConfig,
    ignored: HashSet<String>,
}

impl FlattenEngine {
    /// Create an engine with the default (lenient) configuration
    pub fn new(structure: impl Into<Arc<SurveyStructure>>) -> Self {
        Self::with_config(structure, FlattenConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(structure: impl Into<Arc<SurveyStructure>>, config: FlattenConfig) -> Self {
        let structure = structure.into();
        let layout = TableLayout::from_structure(&structure);

        for (table, column, sources) in layout.collisions() {
            warn!(
                table,
                column,
                questions = ?sources,
                policy = ?config.collision_policy,
                "Several questions share one column"
            );
        }

        let ignored = config.ignore_fields.iter().cloned().collect();
        Self {
            structure,
            layout,
            config,
            ignored,
        }
    }

    /// Parse a form description and build an engine for it
    pub fn from_form(form: &FormDescription, config: FlattenConfig) -> Result<Self, FlattenError> {
        let structure = parse_form(form)?;
        Ok(Self::with_config(structure, config))
    }

    /// The survey structure this engine flattens against
    pub fn structure(&self) -> &SurveyStructure {
        &self.structure
    }

    /// The table layout derived from the structure
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// The active configuration
    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten a batch of submissions into tables
    ///
    /// In strict mode the first validation error aborts the batch and no tables
    /// are returned.
    pub fn flatten(&self, submissions: &[Value]) -> Result<TableSet, FlattenError> {
        self.flatten_with_stats(submissions).map(|(tables, _)| tables)
    }

    /// Flatten a batch and report run statistics
    pub fn flatten_with_stats(
        &self,
        submissions: &[Value],
    ) -> Result<(TableSet, FlattenStats), FlattenError> {
        let mut assembler = TableAssembler::new(&self.layout);
        for (index, submission) in submissions.iter().enumerate() {
            assembler.push(self.flatten_submission(index, submission)?);
        }
        Ok(self.finish(assembler))
    }

    /// Flatten a batch on the rayon pool
    ///
    /// Each submission is tagged with its input index and the partial results
    /// are re-sorted by it, so the output equals [`flatten`](Self::flatten).
    #[cfg(feature = "parallel")]
    pub fn flatten_parallel(&self, submissions: &[Value]) -> Result<TableSet, FlattenError> {
        use rayon::prelude::*;

        let mut tagged: Vec<(usize, Result<SubmissionRows, ValidationError>)> = submissions
            .par_iter()
            .enumerate()
            .map(|(index, submission)| (index, self.flatten_submission(index, submission)))
            .collect();
        tagged.sort_by_key(|(index, _)| *index);

        let mut parts = Vec::with_capacity(tagged.len());
        for (index, result) in tagged {
            parts.push((index, result?));
        }

        let mut assembler = TableAssembler::new(&self.layout);
        assembler.merge_indexed(parts);
        Ok(self.finish(assembler).0)
    }

    fn finish(&self, assembler: TableAssembler<'_>) -> (TableSet, FlattenStats) {
        let (tables, stats) = assembler.finish();
        info!(
            submissions = stats.submissions_processed,
            skipped = stats.submissions_skipped,
            dropped_fields = stats.fields_dropped,
            tables = tables.len(),
            "Flattened submissions"
        );
        (tables, stats)
    }

    /// Flatten one submission; `index` is its position in the batch
    pub fn flatten_submission(
        &self,
        index: usize,
        submission: &Value,
    ) -> Result<SubmissionRows, ValidationError> {
        let mut out = SubmissionRows::new(index, self.layout.len());

        let Some(record) = submission.as_object() else {
            if self.config.strict {
                return Err(ValidationError::ExpectedObject {
                    submission: index,
                    location: "submission root".to_string(),
                    found: value_type_name(submission),
                });
            }
            warn!(submission = index, found = value_type_name(submission), "Skipping malformed submission");
            out.skipped = true;
            return Ok(out);
        };

        let submission_id = self.submission_id(index, record)?;
        let submission_key = id_text(&submission_id);

        let main = self.layout.main();
        let mut row = main.empty_row();
        self.fill_row(index, main, &mut row, record, &mut out)?;
        out.rows[0].push(row);

        let lineage = Lineage {
            submission: index,
            submission_id: &submission_id,
            submission_key: &submission_key,
            ancestors: Vec::new(),
        };
        for &child in &main.children {
            self.walk(child, record, &lineage, &mut out)?;
        }

        Ok(out)
    }

    fn walk(
        &self,
        table_index: usize,
        container: &Map<String, Value>,
        lineage: &Lineage<'_>,
        out: &mut SubmissionRows,
    ) -> Result<(), ValidationError> {
        let spec = self.layout.table(table_index);
        let Some((key, instances)) = self.instances(lineage.submission, spec, container)? else {
            return Ok(());
        };

        let parent_key = lineage
            .ancestors
            .last()
            .map(|(_, id)| id.as_str())
            .unwrap_or(lineage.submission_key);

        for (position, instance) in instances.iter().enumerate() {
            let instance_id = format!("{parent_key}_{}", position + 1);

            let mut row = spec.empty_row();
            row.insert(PARENT_ID_COLUMN.to_string(), lineage.submission_id.clone());
            for (column, id) in &lineage.ancestors {
                row.insert(column.clone(), Value::String(id.clone()));
            }

            let Some(element) = instance.as_object() else {
                if self.config.strict {
                    return Err(ValidationError::ExpectedObject {
                        submission: lineage.submission,
                        location: format!("{key}[{position}]"),
                        found: value_type_name(instance),
                    });
                }
                debug!(
                    submission = lineage.submission,
                    table = %spec.name,
                    position,
                    "Repeat instance is not an object, keeping an empty row"
                );
                out.rows[table_index].push(row);
                continue;
            };

            self.fill_row(lineage.submission, spec, &mut row, element, out)?;
            out.rows[table_index].push(row);

            if spec.children.is_empty() {
                continue;
            }
            let mut ancestors = lineage.ancestors.clone();
            if let Some(id_column) = &spec.id_column {
                ancestors.push((id_column.clone(), instance_id));
            }
            let nested = Lineage {
                ancestors,
                ..*lineage
            };
            for &child in &spec.children {
                self.walk(child, element, &nested, out)?;
            }
        }

        Ok(())
    }

    /// Find the instance array of a repeat group inside `container`
    fn instances<'s, 'v>(
        &self,
        submission: usize,
        spec: &'s TableSpec,
        container: &'v Map<String, Value>,
    ) -> Result<Option<(&'s str, &'v Vec<Value>)>, ValidationError> {
        for key in &spec.lookup_keys {
            let Some(value) = container.get(key.as_str()) else {
                continue;
            };
            return match value {
                Value::Array(items) => Ok(Some((key.as_str(), items))),
                Value::Null => Ok(None),
                other if self.config.strict => Err(ValidationError::ExpectedArray {
                    submission,
                    key: key.clone(),
                    found: value_type_name(other),
                }),
                other => {
                    debug!(
                        submission,
                        key = %key,
                        found = value_type_name(other),
                        "Repeat group key does not hold an array, treating as absent"
                    );
                    Ok(None)
                }
            };
        }
        Ok(None)
    }

    /// Copy scalar fields of `record` into `row` under their last path segment
    fn fill_row(
        &self,
        submission: usize,
        spec: &TableSpec,
        row: &mut FlatRow,
        record: &Map<String, Value>,
        out: &mut SubmissionRows,
    ) -> Result<(), ValidationError> {
        let mut filled: HashSet<&str> = HashSet::new();
        let mut rejected: HashSet<&str> = HashSet::new();

        for (key, value) in record {
            if self.is_child_key(spec, key) {
                continue;
            }

            let column = last_segment(key);
            if !spec.is_fillable(column) {
                if self.ignored.contains(key.as_str()) {
                    continue;
                }
                if self.config.strict {
                    return Err(ValidationError::UndeclaredField {
                        submission,
                        table: spec.name.clone(),
                        field: key.clone(),
                    });
                }
                debug!(submission, table = %spec.name, field = %key, "Dropping undeclared field");
                out.dropped_fields += 1;
                continue;
            }

            // Arrays belong to repeat tables, never to a cell.
            if value.is_array() {
                continue;
            }

            if !filled.insert(column) {
                out.collisions += 1;
                match self.config.collision_policy {
                    CollisionPolicy::KeepFirst => continue,
                    CollisionPolicy::KeepLast => {}
                    CollisionPolicy::Reject if self.config.strict => {
                        return Err(ValidationError::ColumnCollision {
                            submission,
                            table: spec.name.clone(),
                            column: column.to_string(),
                            field: key.clone(),
                        });
                    }
                    CollisionPolicy::Reject => {
                        if rejected.insert(column) {
                            debug!(submission, table = %spec.name, column, "Clearing collided column");
                        }
                        row.insert(column.to_string(), Value::Null);
                        continue;
                    }
                }
            }
            row.insert(column.to_string(), value.clone());
        }

        Ok(())
    }

    fn is_child_key(&self, spec: &TableSpec, key: &str) -> bool {
        spec.children.iter().any(|&child| {
            self.layout
                .table(child)
                .lookup_keys
                .iter()
                .any(|k| k == key)
        })
    }

    fn submission_id(&self, index: usize, record: &Map<String, Value>) -> Result<Value, ValidationError> {
        let id = ["_id", "meta/instanceID"]
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null());

        match id {
            Some(value) => Ok(value.clone()),
            None if self.config.strict => Err(ValidationError::MissingSubmissionId { submission: index }),
            None => Ok(Value::String(String::new())),
        }
    }
}

/// Text form of a submission id used inside synthetic instance ids
fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
