//! Flatten command implementation

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::load_input;
use crate::cli::error::CliError;
use crate::cli::output::{format_stats, write_output};
use crate::export::{ExportFormat, TableSetExporter};
use crate::flatten::{FlattenConfig, FlattenEngine};
use crate::schema::load_form_description;

/// Arguments for the `flatten` command
pub struct FlattenArgs {
    /// Form description file (JSON or YAML)
    pub form: PathBuf,
    /// Submissions file, or `-` for stdin
    pub submissions: String,
    /// Optional TOML configuration file
    pub config: Option<PathBuf>,
    /// Force strict mode regardless of the config file
    pub strict: bool,
    /// Output format (json, yaml)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `flatten` command
pub fn handle_flatten(args: &FlattenArgs) -> Result<(), CliError> {
    let format: ExportFormat = args.format.parse()?;

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FlattenConfig::default(),
    };
    if args.strict {
        config.strict = true;
    }

    let form = load_form_description(&args.form)?;
    let engine = FlattenEngine::from_form(&form, config)?;

    let submissions = parse_submissions(&load_input(&args.submissions)?)?;
    eprintln!("Flattening {} submission(s)...", submissions.len());

    let (tables, stats) = engine.flatten_with_stats(&submissions)?;
    eprint!("{}", format_stats(&stats));

    let result = TableSetExporter::new(format).export(&tables)?;
    write_output(&result.content, args.output.as_deref())
}

/// Load a flatten configuration from TOML
pub fn load_config(path: &Path) -> Result<FlattenConfig, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    toml::from_str(&content).map_err(|e| CliError::ConfigError(e.to_string()))
}

/// Accept a JSON array, a single submission, or a `{"results": [...]}` envelope
pub fn parse_submissions(content: &str) -> Result<Vec<Value>, CliError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| CliError::SubmissionsError(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(CliError::SubmissionsError(
                "'results' is not an array".to_string(),
            )),
            None => Ok(vec![Value::Object(object)]),
        },
        _ => Err(CliError::SubmissionsError(
            "expected an array or an object".to_string(),
        )),
    }
}
