//! Form description parser
//!
//! Walks the nested description once, in document order, and produces the
//! flat [`SurveyStructure`] index. At every level questions are visited before
//! groups. The running sequence number is threaded through the recursion: each
//! step receives the next free value and returns the one after its subtree.

use indexmap::IndexMap;
use tracing::debug;

use super::error::SchemaError;
use crate::models::{FormDescription, GroupSpec, Question, QuestionSpec, RepeatGroup, SurveyStructure};

/// Builds a [`SurveyStructure`] from a [`FormDescription`]
#[derive(Debug, Default)]
pub struct SchemaParser {
    questions: Vec<Question>,
    repeat_groups: Vec<RepeatGroup>,
    sections: Vec<String>,
}

impl SchemaParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form description
    pub fn parse(mut self, form: &FormDescription) -> Result<SurveyStructure, SchemaError> {
        let next = self.parse_level(&form.questions, &form.groups, "", 0, 0)?;

        debug!(
            questions = self.questions.len(),
            repeat_groups = self.repeat_groups.len(),
            sections = self.sections.len(),
            sequence_end = next,
            "Parsed form description"
        );

        SurveyStructure::from_parts(self.questions, self.repeat_groups, self.sections)
    }

    fn parse_level(
        &mut self,
        questions: &IndexMap<String, QuestionSpec>,
        groups: &IndexMap<String, GroupSpec>,
        prefix: &str,
        level: usize,
        mut next: u32,
    ) -> Result<u32, SchemaError> {
        for (name, spec) in questions {
            let full_name = qualify(prefix, name)?;
            let mut question = Question::new(full_name, spec.question_type.clone(), spec.sequence.unwrap_or(next))
                .with_label(spec.label.clone().unwrap_or_else(|| name.clone()))
                .with_required(spec.required);
            question.list_name = spec.list_name.clone();
            self.questions.push(question);
            next += 1;
        }

        for (name, spec) in groups {
            let full_name = qualify(prefix, name)?;
            let child_level = if spec.repeat {
                let group = RepeatGroup::new(full_name.clone(), spec.sequence.unwrap_or(next), level)
                    .with_label(spec.label.clone().unwrap_or_else(|| name.clone()));
                self.repeat_groups.push(group);
                next += 1;
                level + 1
            } else {
                self.sections.push(full_name.clone());
                level
            };

            next = self.parse_level(&spec.questions, &spec.groups, &full_name, child_level, next)?;
        }

        Ok(next)
    }
}

/// Parse a form description into a survey structure
pub fn parse_form(form: &FormDescription) -> Result<SurveyStructure, SchemaError> {
    SchemaParser::new().parse(form)
}

fn qualify(prefix: &str, name: &str) -> Result<String, SchemaError> {
    if name.trim().is_empty() || name.contains('/') {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    if prefix.is_empty() {
        Ok(name.to_string())
    } else {
        Ok(format!("{prefix}/{name}"))
    }
}
