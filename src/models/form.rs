//! Nested form description consumed by the schema parser
//!
//! This mirrors the tree produced by form-content importers:
//!
//! ```json
//! {
//!   "questions": { "age": { "type": "integer", "label": "Age" } },
//!   "groups": {
//!     "household": {
//!       "label": "Household",
//!       "repeat": true,
//!       "questions": { "size": { "type": "integer" } },
//!       "groups": {}
//!     }
//!   }
//! }
//! ```
//!
//! Maps keep insertion order so that document order survives deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of a form description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormDescription {
    /// Questions declared directly at the root
    #[serde(default)]
    pub questions: IndexMap<String, QuestionSpec>,
    /// Groups declared directly at the root
    #[serde(default)]
    pub groups: IndexMap<String, GroupSpec>,
}

/// A question node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionSpec {
    /// Question type
    #[serde(rename = "type")]
    pub question_type: String,
    /// Display label; the node name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether an answer is mandatory
    #[serde(default)]
    pub required: bool,
    /// Explicit document position; the traversal index is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    /// Choice list backing select-type questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
}

impl QuestionSpec {
    /// Create a question node of the given type
    pub fn new(question_type: impl Into<String>) -> Self {
        Self {
            question_type: question_type.into(),
            label: None,
            required: false,
            sequence: None,
            list_name: None,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the explicit sequence
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Set the choice list name
    pub fn with_list_name(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = Some(list_name.into());
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A group node, repeating or not
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupSpec {
    /// Display label; the node name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Explicit document position; the traversal index is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    /// Whether each submission may contain several instances of this group
    #[serde(default)]
    pub repeat: bool,
    /// Nested questions
    #[serde(default)]
    pub questions: IndexMap<String, QuestionSpec>,
    /// Nested groups
    #[serde(default)]
    pub groups: IndexMap<String, GroupSpec>,
}

impl GroupSpec {
    /// Create a non-repeating group
    pub fn section() -> Self {
        Self::default()
    }

    /// Create a repeating group
    pub fn repeat() -> Self {
        Self {
            repeat: true,
            ..Self::default()
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a nested question
    pub fn with_question(mut self, name: impl Into<String>, question: QuestionSpec) -> Self {
        self.questions.insert(name.into(), question);
        self
    }

    /// Add a nested group
    pub fn with_group(mut self, name: impl Into<String>, group: GroupSpec) -> Self {
        self.groups.insert(name.into(), group);
        self
    }
}

impl FormDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root question
    pub fn with_question(mut self, name: impl Into<String>, question: QuestionSpec) -> Self {
        self.questions.insert(name.into(), question);
        self
    }

    /// Add a root group
    pub fn with_group(mut self, name: impl Into<String>, group: GroupSpec) -> Self {
        self.groups.insert(name.into(), group);
        self
    }
}
