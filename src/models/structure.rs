//! Survey structure: the flat index of questions and repeat groups

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::question::{Question, is_within, parent_path};
use super::repeat_group::RepeatGroup;
use crate::schema::SchemaError;

/// Key of the table holding one row per submission
pub const MAIN_TABLE: &str = "main";

/// Linkage column holding the submission id on every non-root row
pub const PARENT_ID_COLUMN: &str = "_parent_id";

/// Every question and repeat group of a form, keyed by fully-qualified name
///
/// Built once per form version and shared read-only afterwards. Questions are
/// kept in sequence order. Non-repeating groups ("sections") are tracked only
/// by path so that every question path can be resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "StructureParts", into = "StructureParts")]
pub struct SurveyStructure {
    questions: IndexMap<String, Question>,
    repeat_groups: IndexMap<String, RepeatGroup>,
    sections: IndexSet<String>,
}

/// Serialized form of a [`SurveyStructure`]; validated on the way in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureParts {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub repeat_groups: Vec<RepeatGroup>,
    #[serde(default)]
    pub sections: Vec<String>,
}

impl TryFrom<StructureParts> for SurveyStructure {
    type Error = SchemaError;

    fn try_from(parts: StructureParts) -> Result<Self, Self::Error> {
        SurveyStructure::from_parts(parts.questions, parts.repeat_groups, parts.sections)
    }
}

impl From<SurveyStructure> for StructureParts {
    fn from(structure: SurveyStructure) -> Self {
        StructureParts {
            questions: structure.questions.into_values().collect(),
            repeat_groups: structure.repeat_groups.into_values().collect(),
            sections: structure.sections.into_iter().collect(),
        }
    }
}

impl SurveyStructure {
    /// Assemble a structure from pre-built parts, verifying its invariants
    ///
    /// Checks that names are well-formed and unique, that every path resolves to
    /// a declared group, that each group's level matches its repeat ancestry and
    /// that repeat group simple names can serve as table keys.
    pub fn from_parts(
        mut questions: Vec<Question>,
        repeat_groups: Vec<RepeatGroup>,
        sections: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for name in sections
            .iter()
            .map(String::as_str)
            .chain(repeat_groups.iter().map(|g| g.name.as_str()))
            .chain(questions.iter().map(|q| q.name.as_str()))
        {
            check_name(name)?;
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateName(name.to_string()));
            }
        }

        let group_names: HashSet<&str> = sections
            .iter()
            .map(String::as_str)
            .chain(repeat_groups.iter().map(|g| g.name.as_str()))
            .collect();
        let resolve = |name: &str, path: &str| -> Result<(), SchemaError> {
            let expected = parent_path(name).unwrap_or_default();
            if path != expected || (!path.is_empty() && !group_names.contains(path)) {
                return Err(SchemaError::UnresolvedPath {
                    name: name.to_string(),
                    path: path.to_string(),
                });
            }
            Ok(())
        };
        for section in &sections {
            resolve(section, parent_path(section).unwrap_or_default())?;
        }
        for group in &repeat_groups {
            resolve(&group.name, &group.path)?;
        }
        for question in &questions {
            resolve(&question.name, &question.path)?;
        }

        for group in &repeat_groups {
            let expected = repeat_groups
                .iter()
                .filter(|other| other.name != group.name && is_within(&group.path, &other.name))
                .count();
            if group.level != expected {
                return Err(SchemaError::InconsistentLevel {
                    name: group.name.clone(),
                    declared: group.level,
                    expected,
                });
            }
        }

        let mut simple_names: HashSet<&str> = HashSet::new();
        for group in &repeat_groups {
            let simple = group.simple_name();
            if simple == MAIN_TABLE || !simple_names.insert(simple) {
                return Err(SchemaError::AmbiguousGroupName(group.name.clone()));
            }
        }

        questions.sort_by_key(|q| q.sequence);

        let structure = Self {
            questions: questions.into_iter().map(|q| (q.name.clone(), q)).collect(),
            repeat_groups: repeat_groups
                .into_iter()
                .map(|g| (g.name.clone(), g))
                .collect(),
            sections: sections.into_iter().collect(),
        };
        structure.check_linkage_columns()?;
        Ok(structure)
    }

    /// Questions inside a repeat group must not shadow its linkage columns
    fn check_linkage_columns(&self) -> Result<(), SchemaError> {
        for question in self.questions.values() {
            let Some(owner) = self.owning_group(question) else {
                continue;
            };
            let column = question.original_name();
            let reserved = column == PARENT_ID_COLUMN
                || self
                    .ancestors_of(owner)
                    .iter()
                    .any(|ancestor| ancestor.id_column() == column);
            if reserved {
                return Err(SchemaError::ReservedColumn {
                    name: question.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// All questions in sequence order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// All repeat groups in declaration order
    pub fn repeat_groups(&self) -> impl Iterator<Item = &RepeatGroup> {
        self.repeat_groups.values()
    }

    /// Paths of non-repeating groups
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(String::as_str)
    }

    /// Look up a question by fully-qualified name
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.get(name)
    }

    /// Look up a repeat group by fully-qualified name
    pub fn repeat_group(&self, name: &str) -> Option<&RepeatGroup> {
        self.repeat_groups.get(name)
    }

    /// Number of questions
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Questions whose enclosing group path is exactly `path` ("" for the root)
    pub fn get_questions_by_path(&self, path: &str) -> Vec<&Question> {
        self.questions.values().filter(|q| q.path == path).collect()
    }

    /// Questions of a given type
    pub fn get_questions_by_type(&self, question_type: &str) -> Vec<&Question> {
        self.questions
            .values()
            .filter(|q| q.question_type == question_type)
            .collect()
    }

    /// Repeat groups by ascending level, ties broken by sequence
    ///
    /// Parents always come before their children in this order.
    pub fn get_repeat_groups_sorted_by_level(&self) -> Vec<&RepeatGroup> {
        let mut groups: Vec<&RepeatGroup> = self.repeat_groups.values().collect();
        groups.sort_by_key(|g| (g.level, g.sequence));
        groups
    }

    /// Deepest repeat group containing `path`, if any
    pub fn nearest_repeat_group(&self, path: &str) -> Option<&RepeatGroup> {
        if path.is_empty() {
            return None;
        }
        self.repeat_groups
            .values()
            .filter(|g| is_within(path, &g.name))
            .max_by_key(|g| g.level)
    }

    /// Repeat group whose table receives this question; `None` means the main table
    pub fn owning_group(&self, question: &Question) -> Option<&RepeatGroup> {
        self.nearest_repeat_group(&question.path)
    }

    /// Repeat groups whose nearest repeat ancestor is `parent` ("" for the root)
    pub fn children_of(&self, parent: &str) -> Vec<&RepeatGroup> {
        let mut children: Vec<&RepeatGroup> = self
            .repeat_groups
            .values()
            .filter(|g| {
                let owner = self.nearest_repeat_group(&g.path).map(|p| p.name.as_str());
                owner.unwrap_or_default() == parent
            })
            .collect();
        children.sort_by_key(|g| g.sequence);
        children
    }

    /// Strict repeat ancestors of a group, outermost first
    pub fn ancestors_of(&self, group: &RepeatGroup) -> Vec<&RepeatGroup> {
        let mut ancestors: Vec<&RepeatGroup> = self
            .repeat_groups
            .values()
            .filter(|other| other.name != group.name && is_within(&group.path, &other.name))
            .collect();
        ancestors.sort_by_key(|g| g.level);
        ancestors
    }
}

fn check_name(name: &str) -> Result<(), SchemaError> {
    if name.split('/').any(|segment| segment.trim().is_empty()) {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    Ok(())
}
