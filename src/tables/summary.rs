//! Read-only summaries of a survey structure
//!
//! Pure functions of the built structure; no submission data is involved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flatten::TableLayout;
use crate::models::SurveyStructure;

/// Overview of a form's shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSummary {
    /// Number of questions
    pub total_questions: usize,
    /// Fully-qualified repeat group names, in level order
    pub repeat_groups: Vec<String>,
    /// Distinct question types, sorted
    pub question_types: Vec<String>,
    /// Question names grouped by enclosing path ("" for the root)
    pub questions_by_path: BTreeMap<String, Vec<String>>,
}

impl StructureSummary {
    /// Summarize a structure
    pub fn from_structure(structure: &SurveyStructure) -> Self {
        Self {
            total_questions: structure.question_count(),
            repeat_groups: repeat_group_names(structure),
            question_types: question_types(structure),
            questions_by_path: questions_by_path(structure),
        }
    }
}

/// Repeat group names in level order
pub fn repeat_group_names(structure: &SurveyStructure) -> Vec<String> {
    structure
        .get_repeat_groups_sorted_by_level()
        .into_iter()
        .map(|g| g.name.clone())
        .collect()
}

/// Distinct question types, sorted
pub fn question_types(structure: &SurveyStructure) -> Vec<String> {
    let mut types: Vec<String> = structure.questions().map(|q| q.question_type.clone()).collect();
    types.sort();
    types.dedup();
    types
}

/// Question names grouped by enclosing path, each list in sequence order
pub fn questions_by_path(structure: &SurveyStructure) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for question in structure.questions() {
        grouped
            .entry(question.path.clone())
            .or_default()
            .push(question.name.clone());
    }
    grouped
}

/// A column fed by more than one question of the same table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCollision {
    pub table: String,
    pub column: String,
    pub questions: Vec<String>,
}

/// Columns that several questions of one table reduce to
pub fn column_collisions(layout: &TableLayout) -> Vec<ColumnCollision> {
    layout
        .collisions()
        .into_iter()
        .map(|(table, column, questions)| ColumnCollision {
            table: table.to_string(),
            column: column.to_string(),
            questions: questions.to_vec(),
        })
        .collect()
}
