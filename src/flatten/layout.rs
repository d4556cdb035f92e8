//! Table layout: the fixed column set of every output table
//!
//! Computed once from the survey structure. Table 0 is the root table; the
//! rest follow the repeat groups by ascending level, then sequence, so a
//! parent table always precedes its children.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::question::is_within;
use crate::models::{FlatRow, MAIN_TABLE, SurveyStructure};

/// System fields present on every submission; leading columns of the root table
pub const METADATA_COLUMNS: &[&str] = &[
    "_id",
    "__version__",
    "_xform_id_string",
    "_uuid",
    "_attachments",
    "_status",
    "_geolocation",
    "_submission_time",
    "_tags",
    "_notes",
    "_validation_status",
    "_submitted_by",
];

pub use crate::models::PARENT_ID_COLUMN;

/// Column layout of one output table
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Table key
    pub name: String,
    /// Display label
    pub label: String,
    /// Fully-qualified name of the owning repeat group, empty for the root
    pub group: String,
    /// Repeat level of the owning group
    pub level: usize,
    /// Sequence of the owning group
    pub sequence: u32,
    /// All columns in output order
    pub columns: Vec<String>,
    /// Metadata (root) or linkage (non-root) columns
    pub fixed_columns: Vec<String>,
    /// Columns filled from raw data and the questions that map onto each
    pub question_columns: IndexMap<String, Vec<String>>,
    /// Column children use to reference an instance of this table
    pub id_column: Option<String>,
    /// Keys under which this group's instance array is looked up, in order
    pub lookup_keys: Vec<String>,
    /// Indices of direct child tables
    pub children: Vec<usize>,
}

impl TableSpec {
    /// Whether raw data may populate this column
    pub fn is_fillable(&self, column: &str) -> bool {
        self.question_columns.contains_key(column)
            || (self.group.is_empty() && self.fixed_columns.iter().any(|c| c == column))
    }

    /// A row with every column set to null
    pub fn empty_row(&self) -> FlatRow {
        self.columns
            .iter()
            .map(|c| (c.clone(), Value::Null))
            .collect()
    }
}

/// Layout of every table derived from one survey structure
#[derive(Debug, Clone)]
pub struct TableLayout {
    tables: Vec<TableSpec>,
}

impl TableLayout {
    /// Derive the layout from a survey structure
    pub fn from_structure(structure: &SurveyStructure) -> Self {
        let groups = structure.get_repeat_groups_sorted_by_level();

        let mut tables = Vec::with_capacity(groups.len() + 1);
        tables.push(TableSpec {
            name: MAIN_TABLE.to_string(),
            label: MAIN_TABLE.to_string(),
            group: String::new(),
            level: 0,
            sequence: 0,
            columns: Vec::new(),
            fixed_columns: METADATA_COLUMNS.iter().map(|c| c.to_string()).collect(),
            question_columns: IndexMap::new(),
            id_column: None,
            lookup_keys: Vec::new(),
            children: Vec::new(),
        });

        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for group in &groups {
            let mut fixed_columns = vec![PARENT_ID_COLUMN.to_string()];
            fixed_columns.extend(structure.ancestors_of(group).iter().map(|a| a.id_column()));

            let mut lookup_keys = vec![group.name.clone()];
            if group.simple_name() != group.name {
                lookup_keys.push(group.simple_name().to_string());
            }

            index_of.insert(group.name.as_str(), tables.len());
            tables.push(TableSpec {
                name: group.simple_name().to_string(),
                label: group.label.clone(),
                group: group.name.clone(),
                level: group.level,
                sequence: group.sequence,
                columns: Vec::new(),
                fixed_columns,
                question_columns: IndexMap::new(),
                id_column: Some(group.id_column()),
                lookup_keys,
                children: Vec::new(),
            });
        }

        for group in &groups {
            let parent = structure
                .nearest_repeat_group(&group.path)
                .and_then(|p| index_of.get(p.name.as_str()).copied())
                .unwrap_or(0);
            let child = index_of[group.name.as_str()];
            tables[parent].children.push(child);
        }

        for question in structure.questions() {
            let owner = structure
                .owning_group(question)
                .and_then(|g| index_of.get(g.name.as_str()).copied())
                .unwrap_or(0);
            tables[owner]
                .question_columns
                .entry(question.original_name().to_string())
                .or_default()
                .push(question.name.clone());
        }

        // Repeat tables list every descendant question, nested repeats included;
        // only owned columns are ever filled.
        for table in &mut tables {
            let mut columns = table.fixed_columns.clone();
            let names: Vec<&str> = if table.group.is_empty() {
                table.question_columns.keys().map(String::as_str).collect()
            } else {
                structure
                    .questions()
                    .filter(|q| is_within(&q.path, &table.group))
                    .map(|q| q.original_name())
                    .collect()
            };
            for name in names {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
            table.columns = columns;
        }

        Self { tables }
    }

    /// Table specs in output order
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// Table spec by index
    pub fn table(&self, index: usize) -> &TableSpec {
        &self.tables[index]
    }

    /// The root table spec
    pub fn main(&self) -> &TableSpec {
        &self.tables[0]
    }

    /// Look up a table spec by key
    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Always false: the root table exists for every structure
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Columns fed by more than one question, per table
    pub fn collisions(&self) -> Vec<(&str, &str, &[String])> {
        self.tables
            .iter()
            .flat_map(|t| {
                t.question_columns
                    .iter()
                    .filter(|(_, sources)| sources.len() > 1)
                    .map(move |(column, sources)| (t.name.as_str(), column.as_str(), sources.as_slice()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormDescription, GroupSpec, QuestionSpec};
    use crate::schema::parse_form;

    fn layout() -> TableLayout {
        let form = FormDescription::new()
            .with_question("age", QuestionSpec::new("integer"))
            .with_group(
                "vivienda",
                GroupSpec::section().with_question("material", QuestionSpec::new("text")),
            )
            .with_group(
                "techo",
                GroupSpec::section().with_question("material", QuestionSpec::new("text")),
            )
            .with_group(
                "household",
                GroupSpec::repeat()
                    .with_question("size", QuestionSpec::new("integer"))
                    .with_group(
                        "person",
                        GroupSpec::repeat().with_question("name", QuestionSpec::new("text")),
                    ),
            );
        TableLayout::from_structure(&parse_form(&form).unwrap())
    }

    #[test]
    fn test_table_order_and_columns() {
        let layout = layout();
        let names: Vec<&str> = layout.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["main", "household", "person"]);

        let main = layout.main();
        assert_eq!(&main.columns[..METADATA_COLUMNS.len()], METADATA_COLUMNS);
        assert_eq!(&main.columns[METADATA_COLUMNS.len()..], &["age", "material"]);

        let person = layout.get("person").unwrap();
        assert_eq!(person.columns, vec!["_parent_id", "_household_id", "name"]);
        assert_eq!(person.lookup_keys, vec!["household/person", "person"]);

        let household = layout.get("household").unwrap();
        assert_eq!(household.columns, vec!["_parent_id", "size", "name"]);
        assert!(household.is_fillable("size"));
        assert!(!household.is_fillable("name"));
        assert_eq!(household.children, vec![2]);
        assert_eq!(main.children, vec![1]);
    }

    #[test]
    fn test_collisions_reported() {
        let layout = layout();
        let collisions = layout.collisions();
        assert_eq!(collisions.len(), 1);
        let (table, column, sources) = collisions[0];
        assert_eq!(table, "main");
        assert_eq!(column, "material");
        assert_eq!(sources, &["vivienda/material".to_string(), "techo/material".to_string()]);
    }

    #[test]
    fn test_linkage_columns_not_fillable() {
        let layout = layout();
        let person = layout.get("person").unwrap();
        assert!(person.is_fillable("name"));
        assert!(!person.is_fillable("_parent_id"));
        assert!(layout.main().is_fillable("_submission_time"));
    }
}
