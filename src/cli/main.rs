//! survey-tables CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use survey_tables::cli::CliError;
use survey_tables::cli::commands::flatten::{FlattenArgs, handle_flatten};
use survey_tables::cli::commands::import::handle_import;
use survey_tables::cli::commands::summary::handle_summary;

#[derive(Parser)]
#[command(name = "survey-tables")]
#[command(about = "Flatten nested survey submissions into relational tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten submissions into one table per repeat group
    Flatten {
        /// Form description file (JSON or YAML)
        #[arg(long)]
        form: PathBuf,
        /// Submissions JSON file, or '-' for stdin
        #[arg(long)]
        submissions: String,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail on the first submission that disagrees with the form
        #[arg(long)]
        strict: bool,
        /// Output format (json, yaml)
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize the structure of a form
    Summary {
        /// Form description file (JSON or YAML)
        #[arg(long)]
        form: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert form content into a form description
    Import {
        /// Form content JSON file, or '-' for stdin
        #[arg(long)]
        content: String,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Flatten {
            form,
            submissions,
            config,
            strict,
            format,
            output,
        } => handle_flatten(&FlattenArgs {
            form,
            submissions,
            config,
            strict,
            format,
            output,
        }),
        Commands::Summary { form, json } => handle_summary(&form, json),
        Commands::Import { content, output } => handle_import(&content, output.as_deref()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run(cli).map_err(|err| anyhow::anyhow!(err.user_message()))
}
