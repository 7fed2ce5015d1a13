//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;
use tiller_migrate::MigrationError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tiller::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tiller::config))]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    #[diagnostic(code(tiller::database))]
    Database(String),

    /// Runner error
    #[error(transparent)]
    #[diagnostic(code(tiller::run))]
    Run(#[from] MigrationError),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::Config(format!("Failed to serialize TOML: {}", err))
    }
}

impl From<rusqlite::Error> for CliError {
    fn from(err: rusqlite::Error) -> Self {
        CliError::Database(err.to_string())
    }
}
