//! Logging setup for the CLI.
//!
//! # Environment Variables
//!
//! - `TILLER_LOG=debug|info|warn|error|trace` - Set the log level, or a full
//!   `EnvFilter` directive such as `tiller_migrate=trace`
//! - `TILLER_LOG_FORMAT=json|pretty|compact` - Set output format (default: compact)
//!
//! Logs go to stderr so they never mix with command output.

use std::env;

use tracing_subscriber::EnvFilter;

/// Level used when neither `TILLER_LOG` nor `-v` is given.
const DEFAULT_LEVEL: &str = "warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable output.
    Compact,
    /// Multi-line human readable output.
    Pretty,
    /// Structured JSON lines.
    Json,
}

impl LogFormat {
    /// Parse a format name, falling back to compact.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Pick the filter directive from the environment value and `-v` count.
///
/// An explicit `TILLER_LOG` wins over `-v`.
pub fn filter_directive(env_value: Option<&str>, verbose: u8) -> String {
    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_string();
    }

    match verbose {
        0 => DEFAULT_LEVEL.to_string(),
        1 => "tiller_migrate=debug,tiller_cli=debug,info".to_string(),
        _ => "tiller_migrate=trace,tiller_cli=trace,debug".to_string(),
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: u8) {
    let env_value = env::var("TILLER_LOG").ok();
    let directive = filter_directive(env_value.as_deref(), verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let format = env::var("TILLER_LOG_FORMAT")
        .map(|f| LogFormat::parse(&f))
        .unwrap_or(LogFormat::Compact);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if result.is_ok() {
        tracing::debug!(%directive, ?format, "Logging initialized");
    }
}
