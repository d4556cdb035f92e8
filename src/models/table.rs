//! Output tables produced by flattening

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One output row: column name to value, in column order
///
/// Every column of the owning table is present; missing data is `Value::Null`.
pub type FlatRow = IndexMap<String, Value>;

/// A flat table: the root table or the table of exactly one repeat group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table key: `main` or the repeat group's simple name
    pub name: String,
    /// Display label
    pub label: String,
    /// Fully-qualified name of the owning repeat group, empty for the root table
    #[serde(default)]
    pub group: String,
    /// Repeat level of the owning group (0 for the root table)
    #[serde(default)]
    pub level: usize,
    /// Sequence of the owning group (0 for the root table)
    #[serde(default)]
    pub sequence: u32,
    /// Ordered column names
    pub columns: Vec<String>,
    /// Rows in submission order
    pub rows: Vec<FlatRow>,
}

impl Table {
    /// Whether this is the root table
    pub fn is_main(&self) -> bool {
        self.group.is_empty()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        if !self.columns.iter().any(|c| c == name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(name).unwrap_or(&Value::Null))
                .collect(),
        )
    }
}

/// Ordered set of output tables: root first, then repeat groups by level and sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    /// Wrap already-ordered tables
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// The root table
    pub fn main(&self) -> Option<&Table> {
        self.tables.iter().find(|t| t.is_main())
    }

    /// Look up a table by key
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table keys in output order
    pub fn keys(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Iterate tables in output order
    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no tables at all
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Consume into the ordered table list
    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
