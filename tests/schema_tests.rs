//! Schema construction tests

use std::io::Write;
use std::path::Path;

use survey_tables::models::{
    FormDescription, GroupSpec, Question, QuestionSpec, RepeatGroup, SurveyStructure,
};
use survey_tables::schema::{SchemaError, load_form_description, load_structure, parse_form};
use survey_tables::tables::StructureSummary;

fn census_form() -> FormDescription {
    FormDescription::new()
        .with_question("start", QuestionSpec::new("start"))
        .with_group(
            "location",
            GroupSpec::section()
                .with_question("village", QuestionSpec::new("text").required()),
        )
        .with_group(
            "household",
            GroupSpec::repeat()
                .with_label("Household")
                .with_question("size", QuestionSpec::new("integer"))
                .with_group(
                    "person",
                    GroupSpec::repeat()
                        .with_question("name", QuestionSpec::new("text"))
                        .with_question(
                            "sex",
                            QuestionSpec::new("select_one").with_list_name("sexes"),
                        ),
                ),
        )
}

mod parser_tests {
    use super::*;

    #[test]
    fn test_paths_levels_and_sequence() {
        let structure = parse_form(&census_form()).unwrap();

        let village = structure.question("location/village").unwrap();
        assert_eq!(village.path, "location");
        assert_eq!(village.original_name(), "village");
        assert!(village.required);

        let household = structure.repeat_group("household").unwrap();
        assert_eq!(household.level, 0);
        assert_eq!(household.label, "Household");

        let person = structure.repeat_group("household/person").unwrap();
        assert_eq!(person.level, 1);
        assert_eq!(person.path, "household");
        assert_eq!(person.id_column(), "_person_id");

        let sequences: Vec<u32> = structure.questions().map(|q| q.sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort();
        assert_eq!(sequences, sorted);
        assert_eq!(structure.question("start").unwrap().sequence, 0);
    }

    #[test]
    fn test_ownership_and_ancestry() {
        let structure = parse_form(&census_form()).unwrap();

        let village = structure.question("location/village").unwrap();
        assert!(structure.owning_group(village).is_none());

        let sex = structure.question("household/person/sex").unwrap();
        assert_eq!(structure.owning_group(sex).unwrap().name, "household/person");

        let person = structure.repeat_group("household/person").unwrap();
        let ancestors: Vec<&str> = structure
            .ancestors_of(person)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(ancestors, vec!["household"]);

        let children: Vec<&str> = structure
            .children_of("")
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(children, vec!["household"]);
    }

    #[test]
    fn test_invalid_names() {
        let slash = FormDescription::new().with_question("a/b", QuestionSpec::new("text"));
        assert_eq!(
            parse_form(&slash),
            Err(SchemaError::InvalidName("a/b".to_string()))
        );

        let blank = FormDescription::new().with_group(" ", GroupSpec::section());
        assert!(matches!(parse_form(&blank), Err(SchemaError::InvalidName(_))));
    }

    #[test]
    fn test_ambiguous_group_names() {
        let twice = FormDescription::new()
            .with_group(
                "a",
                GroupSpec::repeat().with_group("items", GroupSpec::repeat()),
            )
            .with_group(
                "b",
                GroupSpec::repeat().with_group("items", GroupSpec::repeat()),
            );
        assert_eq!(
            parse_form(&twice),
            Err(SchemaError::AmbiguousGroupName("b/items".to_string()))
        );

        let reserved = FormDescription::new().with_group("main", GroupSpec::repeat());
        assert!(matches!(
            parse_form(&reserved),
            Err(SchemaError::AmbiguousGroupName(_))
        ));
    }

    #[test]
    fn test_linkage_column_names_are_reserved() {
        let parent = FormDescription::new().with_group(
            "household",
            GroupSpec::repeat().with_question("_parent_id", QuestionSpec::new("text")),
        );
        assert_eq!(
            parse_form(&parent),
            Err(SchemaError::ReservedColumn {
                name: "household/_parent_id".to_string(),
                column: "_parent_id".to_string(),
            })
        );

        let ancestor = FormDescription::new().with_group(
            "household",
            GroupSpec::repeat().with_group(
                "person",
                GroupSpec::repeat().with_question("_household_id", QuestionSpec::new("text")),
            ),
        );
        let err = parse_form(&ancestor).unwrap_err();
        assert!(matches!(err, SchemaError::ReservedColumn { ref column, .. } if column == "_household_id"));
        assert!(err.user_message().contains("Hint"));

        // Outside repeat groups these names are plain columns.
        let root = FormDescription::new()
            .with_question("_parent_id", QuestionSpec::new("text"))
            .with_group(
                "household",
                GroupSpec::repeat().with_question("_person_id", QuestionSpec::new("text")),
            );
        assert!(parse_form(&root).is_ok());
    }

    #[test]
    fn test_question_and_group_sharing_a_name() {
        let form = FormDescription::new()
            .with_question("household", QuestionSpec::new("text"))
            .with_group("household", GroupSpec::repeat());
        assert_eq!(
            parse_form(&form),
            Err(SchemaError::DuplicateName("household".to_string()))
        );
    }
}

mod structure_tests {
    use super::*;

    #[test]
    fn test_from_parts_checks_paths_and_levels() {
        let orphan = Question::new("nowhere/q", "text", 0);
        assert!(matches!(
            SurveyStructure::from_parts(vec![orphan], Vec::new(), Vec::new()),
            Err(SchemaError::UnresolvedPath { .. })
        ));

        let outer = RepeatGroup::new("outer", 0, 0);
        let inner = RepeatGroup::new("outer/inner", 1, 0);
        assert_eq!(
            SurveyStructure::from_parts(Vec::new(), vec![outer, inner], Vec::new()),
            Err(SchemaError::InconsistentLevel {
                name: "outer/inner".to_string(),
                declared: 0,
                expected: 1,
            })
        );
    }

    #[test]
    fn test_structure_serde_round_trip_validates() {
        let structure = parse_form(&census_form()).unwrap();
        let json = serde_json::to_string(&structure).unwrap();
        let back: SurveyStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(structure, back);

        let broken = r#"{"questions": [{"name": "x/y", "type": "text", "label": "y", "sequence": 0, "path": "x"}]}"#;
        assert!(serde_json::from_str::<SurveyStructure>(broken).is_err());
    }

    #[test]
    fn test_summary() {
        let structure = parse_form(&census_form()).unwrap();
        let summary = StructureSummary::from_structure(&structure);

        assert_eq!(summary.total_questions, 5);
        assert_eq!(summary.repeat_groups, vec!["household", "household/person"]);
        assert_eq!(
            summary.question_types,
            vec!["integer", "select_one", "start", "text"]
        );
        assert_eq!(
            summary.questions_by_path["household/person"],
            vec!["household/person/name", "household/person/sex"]
        );
        assert_eq!(summary.questions_by_path[""], vec!["start"]);
    }
}

mod loader_tests {
    use super::*;

    #[test]
    fn test_load_yaml_form() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "questions:\n  age:\n    type: integer\ngroups:\n  members:\n    repeat: true\n    questions:\n      name:\n        type: text\n        label: Name"
        )
        .unwrap();

        let form = load_form_description(file.path()).unwrap();
        assert!(form.groups["members"].repeat);

        let structure = load_structure(file.path()).unwrap();
        assert_eq!(structure.question("members/name").unwrap().label, "Name");
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = load_structure(Path::new("/nonexistent/form.json"));
        match result {
            Err(err @ SchemaError::Unavailable { .. }) => {
                assert!(err.user_message().contains("Hint"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{\"questions\": [").unwrap();
        assert!(matches!(
            load_form_description(file.path()),
            Err(SchemaError::Unavailable { .. })
        ));
    }
}
