//! Question model

use serde::{Deserialize, Serialize};

/// A single survey question resolved to its position in the form tree
///
/// Questions are produced by the schema parser and never change afterwards.
/// The column a question fills is its [`original_name`](Question::original_name),
/// the last segment of its fully-qualified name.
///
/// # Example
///
/// ```rust
/// use survey_tables::models::Question;
///
/// let question = Question::new("household/person/age", "integer", 4);
/// assert_eq!(question.original_name(), "age");
/// assert_eq!(question.path, "household/person");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Fully-qualified, slash-separated name
    pub name: String,
    /// Question type as declared by the form (e.g. "integer", "select_one")
    #[serde(rename = "type")]
    pub question_type: String,
    /// Display label (falls back to the bare name)
    pub label: String,
    /// Position in document order
    pub sequence: u32,
    /// Whether an answer is mandatory
    #[serde(default)]
    pub required: bool,
    /// Choice list backing select-type questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    /// Fully-qualified name of the enclosing group, empty at the root
    #[serde(default)]
    pub path: String,
}

impl Question {
    /// Create a question from its fully-qualified name; the path is derived from it
    pub fn new(name: impl Into<String>, question_type: impl Into<String>, sequence: u32) -> Self {
        let name = name.into();
        let path = parent_path(&name).unwrap_or_default().to_string();
        let label = last_segment(&name).to_string();
        Self {
            name,
            question_type: question_type.into(),
            label,
            sequence,
            required: false,
            list_name: None,
            path,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark the question as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the choice list name
    pub fn with_list_name(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = Some(list_name.into());
        self
    }

    /// Column name: the last segment of the fully-qualified name
    pub fn original_name(&self) -> &str {
        last_segment(&self.name)
    }

    /// Whether the question sits directly at the root of the form
    pub fn is_root_level(&self) -> bool {
        self.path.is_empty()
    }
}

/// Last `/`-separated segment of a path
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the last `/`, or `None` for a single segment
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// True when `path` equals `ancestor` or is nested below it
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    path == ancestor
        || (path.len() > ancestor.len()
            && path.starts_with(ancestor)
            && path.as_bytes()[ancestor.len()] == b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_name() {
        assert_eq!(Question::new("age", "integer", 0).original_name(), "age");
        assert_eq!(
            Question::new("household/person/age", "integer", 0).original_name(),
            "age"
        );
    }

    #[test]
    fn test_path_derived_from_name() {
        let q = Question::new("section/name", "text", 1);
        assert_eq!(q.path, "section");
        assert!(!q.is_root_level());
        assert!(Question::new("name", "text", 1).is_root_level());
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("household/person", "household"));
        assert!(is_within("household", "household"));
        assert!(!is_within("householder", "household"));
        assert!(!is_within("house", "household"));
        assert!(is_within("anything", ""));
    }
}
