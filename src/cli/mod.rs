//! CLI module for the survey-tables binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
