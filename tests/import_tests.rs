//! Import and export tests

use serde_json::{Value, json};
use survey_tables::export::{ExportFormat, TableSetExporter, sheet_names};
use survey_tables::flatten::{FlattenConfig, FlattenEngine};
use survey_tables::import::{FormContentImporter, ImportError};
use survey_tables::schema::parse_form;

fn asset() -> Value {
    json!({
        "name": "Household census",
        "content": {
            "survey": [
                {"type": "start", "$autoname": "start"},
                {"type": "begin_group", "name": "location", "label": ["Location"]},
                {"type": "text", "name": "village", "required": "true"},
                {"type": "end_group"},
                {"type": "begin_repeat", "name": "household", "label": ["Household members?"]},
                {"type": "integer", "name": "size"},
                {"type": "begin_repeat", "name": "person", "label": []},
                {"type": "text", "name": "name"},
                {"type": "select_one", "name": "sex", "select_from_list_name": "sexes"},
                {"type": "end_repeat"},
                {"type": "end_repeat"}
            ],
            "choices": [
                {"list_name": "sexes", "name": "f", "label": ["Female"]},
                {"list_name": "sexes", "name": "m", "label": ["Male"]}
            ]
        }
    })
}

mod form_content_tests {
    use super::*;

    #[test]
    fn test_import_asset_structure() {
        let imported = FormContentImporter::new().import_asset(&asset()).unwrap();
        let structure = parse_form(&imported.form).unwrap();

        assert!(structure.sections().any(|s| s == "location"));
        assert!(structure.question("location/village").unwrap().required);
        assert_eq!(
            structure.repeat_group("household").unwrap().label,
            "Household members?"
        );
        assert_eq!(
            structure.repeat_group("household/person").unwrap().level,
            1
        );
        assert_eq!(
            structure
                .question("household/person/sex")
                .unwrap()
                .list_name
                .as_deref(),
            Some("sexes")
        );
        assert_eq!(imported.choices["sexes"].len(), 2);
    }

    #[test]
    fn test_sequences_follow_row_order() {
        let imported = FormContentImporter::new().import_asset(&asset()).unwrap();
        let structure = parse_form(&imported.form).unwrap();

        let names: Vec<&str> = structure.questions().map(|q| q.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "start",
                "location/village",
                "household/size",
                "household/person/name",
                "household/person/sex"
            ]
        );
    }

    #[test]
    fn test_duplicate_names_in_one_group() {
        let content = json!({
            "survey": [
                {"type": "text", "name": "a"},
                {"type": "integer", "name": "a"}
            ]
        });
        assert!(matches!(
            FormContentImporter::new().import(&content),
            Err(ImportError::DuplicateName(name)) if name == "a"
        ));
    }

    #[test]
    fn test_unnamed_group() {
        let content = json!({"survey": [{"type": "begin_repeat"}, {"type": "end_repeat"}]});
        assert!(matches!(
            FormContentImporter::new().import(&content),
            Err(ImportError::UnnamedGroup { row: 0 })
        ));
    }
}

mod end_to_end_tests {
    use super::*;

    fn flatten() -> survey_tables::models::TableSet {
        let imported = FormContentImporter::new().import_asset(&asset()).unwrap();
        let engine = FlattenEngine::from_form(&imported.form, FlattenConfig::strict()).unwrap();
        let submissions = vec![json!({
            "_id": 901,
            "start": "2024-03-01T08:00:00",
            "location/village": "Kalo",
            "meta/instanceID": "uuid:901",
            "household": [{
                "household/size": 2,
                "household/person": [
                    {"household/person/name": "Ana", "household/person/sex": "f"},
                    {"household/person/name": "Ben", "household/person/sex": "m"}
                ]
            }]
        })];
        engine.flatten(&submissions).unwrap()
    }

    #[test]
    fn test_imported_form_flattens() {
        let tables = flatten();
        assert_eq!(tables.main().unwrap().rows[0]["village"], json!("Kalo"));

        let person = tables.get("person").unwrap();
        assert_eq!(person.len(), 2);
        assert_eq!(person.rows[1]["_household_id"], json!("901_1"));
        assert_eq!(person.rows[1]["sex"], json!("m"));
    }

    #[test]
    fn test_sheet_names_for_imported_form() {
        let tables = flatten();
        // The empty person label falls back to the group name.
        assert_eq!(
            sheet_names(&tables, "Household census"),
            vec!["Household_census", "Household_members", "person"]
        );
    }

    #[test]
    fn test_export_to_file() {
        let tables = flatten();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");

        TableSetExporter::new(ExportFormat::Json)
            .export_to_file(&tables, &path)
            .unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let names: Vec<&str> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["main", "household", "person"]);
        assert_eq!(written[2]["columns"][1], json!("_household_id"));
    }
}
