//! Form content import
//!
//! Converts form-authoring content (a flat `survey` row list delimited by
//! `begin_group`/`end_group` and `begin_repeat`/`end_repeat` markers, plus a
//! `choices` list) into the nested [`FormDescription`] the schema parser reads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::ImportError;
use crate::models::{FormDescription, GroupSpec, QuestionSpec};

/// One option of a choice list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub name: String,
    pub label: String,
    pub list_name: String,
    pub sequence: u32,
}

/// Choice lists keyed by list name, then by choice name
pub type ChoiceLists = IndexMap<String, IndexMap<String, Choice>>;

/// Result of importing form content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedForm {
    /// Nested form description
    pub form: FormDescription,
    /// Choice lists referenced by select questions
    pub choices: ChoiceLists,
}

#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(rename = "type", default)]
    row_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "$autoname", default)]
    autoname: Option<String>,
    #[serde(default)]
    label: Option<Value>,
    #[serde(default)]
    required: Option<Value>,
    #[serde(default)]
    select_from_list_name: Option<String>,
}

impl SurveyRow {
    fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.autoname.as_deref())
            .filter(|n| !n.trim().is_empty())
    }

    fn label(&self) -> Option<String> {
        self.label.as_ref().and_then(extract_label)
    }
}

#[derive(Debug, Deserialize)]
struct ChoiceRow {
    list_name: String,
    name: String,
    #[serde(default)]
    label: Option<Value>,
}

/// A group being filled while its rows are read
struct Frame {
    name: String,
    row: usize,
    group: GroupSpec,
}

/// Form content importer
#[derive(Debug, Default)]
pub struct FormContentImporter;

impl FormContentImporter {
    /// Create a new importer
    pub fn new() -> Self {
        Self
    }

    /// Import an asset document, reading its `content` member
    pub fn import_asset(&self, asset: &Value) -> Result<ImportedForm, ImportError> {
        let content = asset
            .get("content")
            .ok_or_else(|| ImportError::InvalidContent("asset has no 'content' member".to_string()))?;
        self.import(content)
    }

    /// Import a content document with `survey` and `choices` lists
    pub fn import(&self, content: &Value) -> Result<ImportedForm, ImportError> {
        let rows: Vec<SurveyRow> = match content.get("survey") {
            Some(survey) => serde_json::from_value(survey.clone())?,
            None => Vec::new(),
        };
        let choice_rows: Vec<ChoiceRow> = match content.get("choices") {
            Some(choices) => serde_json::from_value(choices.clone())?,
            None => Vec::new(),
        };

        let form = self.build_form(&rows)?;
        let choices = build_choices(choice_rows);

        debug!(
            rows = rows.len(),
            questions = form.questions.len(),
            groups = form.groups.len(),
            choice_lists = choices.len(),
            "Imported form content"
        );

        Ok(ImportedForm { form, choices })
    }

    fn build_form(&self, rows: &[SurveyRow]) -> Result<FormDescription, ImportError> {
        let mut root = GroupSpec::section();
        let mut stack: Vec<Frame> = Vec::new();
        let mut sequence = 0u32;

        for (index, row) in rows.iter().enumerate() {
            match row.row_type.as_str() {
                "begin_group" | "begin_repeat" => {
                    let name = row
                        .name()
                        .ok_or(ImportError::UnnamedGroup { row: index })?
                        .to_string();
                    let mut group = if row.row_type == "begin_repeat" {
                        GroupSpec::repeat()
                    } else {
                        GroupSpec::section()
                    };
                    group.label = row.label();
                    group.sequence = Some(sequence);
                    sequence += 1;
                    stack.push(Frame {
                        name,
                        row: index,
                        group,
                    });
                }
                "end_group" | "end_repeat" => {
                    let frame = stack
                        .pop()
                        .ok_or(ImportError::UnbalancedEnd { row: index })?;
                    let parent = stack.last_mut().map(|f| &mut f.group).unwrap_or(&mut root);
                    if parent.groups.contains_key(&frame.name) {
                        return Err(ImportError::DuplicateName(frame.name));
                    }
                    parent.groups.insert(frame.name, frame.group);
                }
                _ => {
                    let Some(name) = row.name() else {
                        debug!(row = index, row_type = %row.row_type, "Skipping unnamed survey row");
                        continue;
                    };
                    let question = QuestionSpec {
                        question_type: row.row_type.clone(),
                        label: Some(row.label().unwrap_or_else(|| name.to_string())),
                        required: row.required.as_ref().is_some_and(is_truthy),
                        sequence: Some(sequence),
                        list_name: row.select_from_list_name.clone(),
                    };
                    sequence += 1;

                    let parent = stack.last_mut().map(|f| &mut f.group).unwrap_or(&mut root);
                    if parent.questions.contains_key(name) {
                        return Err(ImportError::DuplicateName(name.to_string()));
                    }
                    parent.questions.insert(name.to_string(), question);
                }
            }
        }

        if let Some(frame) = stack.pop() {
            return Err(ImportError::UnclosedGroup {
                name: frame.name,
                row: frame.row,
            });
        }

        Ok(FormDescription {
            questions: root.questions,
            groups: root.groups,
        })
    }
}

fn build_choices(rows: Vec<ChoiceRow>) -> ChoiceLists {
    let mut lists = ChoiceLists::new();
    for (sequence, row) in rows.into_iter().enumerate() {
        let label = row
            .label
            .as_ref()
            .and_then(extract_label)
            .unwrap_or_else(|| row.name.clone());
        lists.entry(row.list_name.clone()).or_default().insert(
            row.name.clone(),
            Choice {
                name: row.name,
                label,
                list_name: row.list_name,
                sequence: sequence as u32,
            },
        );
    }
    lists
}

/// A label is either a string or a list of translations; the first one wins
fn extract_label(label: &Value) -> Option<String> {
    let text = match label {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.first().and_then(Value::as_str)?.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content() -> Value {
        json!({
            "survey": [
                {"type": "start", "name": "start"},
                {"type": "integer", "name": "age", "label": ["Age", "Edad"], "required": true},
                {"type": "begin_repeat", "name": "household", "label": ["Household"]},
                {"type": "select_one", "$autoname": "material", "select_from_list_name": "materials"},
                {"type": "begin_repeat", "name": "person"},
                {"type": "text", "name": "name", "required": "yes"},
                {"type": "end_repeat"},
                {"type": "end_repeat"},
                {"type": "note", "label": "no name"}
            ],
            "choices": [
                {"list_name": "materials", "name": "wood", "label": ["Wood"]},
                {"list_name": "materials", "name": "brick"}
            ]
        })
    }

    #[test]
    fn test_import_nested_groups() {
        let imported = FormContentImporter::new().import(&content()).unwrap();
        let form = imported.form;

        assert_eq!(form.questions.keys().collect::<Vec<_>>(), vec!["start", "age"]);
        assert_eq!(form.questions["age"].label.as_deref(), Some("Age"));
        assert!(form.questions["age"].required);

        let household = &form.groups["household"];
        assert!(household.repeat);
        assert_eq!(household.label.as_deref(), Some("Household"));
        assert_eq!(household.sequence, Some(2));
        assert_eq!(
            household.questions["material"].list_name.as_deref(),
            Some("materials")
        );

        let person = &household.groups["person"];
        assert!(person.repeat);
        assert!(person.questions["name"].required);
        assert_eq!(person.questions["name"].sequence, Some(5));
    }

    #[test]
    fn test_import_choices() {
        let imported = FormContentImporter::new().import(&content()).unwrap();
        let materials = &imported.choices["materials"];
        assert_eq!(materials["wood"].label, "Wood");
        assert_eq!(materials["brick"].label, "brick");
        assert_eq!(materials["brick"].sequence, 1);
    }

    #[test]
    fn test_unbalanced_markers() {
        let extra_end = json!({"survey": [{"type": "end_group"}]});
        assert!(matches!(
            FormContentImporter::new().import(&extra_end),
            Err(ImportError::UnbalancedEnd { row: 0 })
        ));

        let unclosed = json!({"survey": [{"type": "begin_group", "name": "g"}]});
        assert!(matches!(
            FormContentImporter::new().import(&unclosed),
            Err(ImportError::UnclosedGroup { .. })
        ));
    }

    #[test]
    fn test_import_asset_requires_content() {
        let result = FormContentImporter::new().import_asset(&json!({"name": "x"}));
        assert!(matches!(result, Err(ImportError::InvalidContent(_))));
    }
}
