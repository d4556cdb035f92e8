//! Repeat group model

use serde::{Deserialize, Serialize};

use super::question::{last_segment, parent_path};

/// A group flagged to repeat; every instance becomes one row in its own table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroup {
    /// Fully-qualified, slash-separated name
    pub name: String,
    /// Display label (falls back to the bare name)
    pub label: String,
    /// Position in document order
    pub sequence: u32,
    /// Fully-qualified name of the parent group, empty at the root
    #[serde(default)]
    pub path: String,
    /// Number of repeat groups strictly above this one
    #[serde(default)]
    pub level: usize,
}

impl RepeatGroup {
    /// Create a repeat group from its fully-qualified name
    pub fn new(name: impl Into<String>, sequence: u32, level: usize) -> Self {
        let name = name.into();
        let path = parent_path(&name).unwrap_or_default().to_string();
        let label = last_segment(&name).to_string();
        Self {
            name,
            label,
            sequence,
            path,
            level,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Name without the path prefix; used as table key and in linkage columns
    pub fn simple_name(&self) -> &str {
        last_segment(&self.name)
    }

    /// Parent path, `None` when the group sits directly at the root
    pub fn parent_path(&self) -> Option<&str> {
        if self.path.is_empty() {
            None
        } else {
            Some(&self.path)
        }
    }

    /// Name of the linkage column children use to point at an instance of this group
    pub fn id_column(&self) -> String {
        format!("_{}_id", self.simple_name())
    }
}
