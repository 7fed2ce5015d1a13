//! CLI configuration handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tiller_migrate::{LedgerTable, RunnerConfig, UnitOrdering};

use crate::error::{CliError, CliResult};

/// Default config file name (lives in project root)
pub const CONFIG_FILE_NAME: &str = "tiller.toml";

/// Default database file (relative to project root)
pub const DATABASE_PATH: &str = "tiller.db";

/// Default migrations directory (relative to project root)
pub const MIGRATIONS_DIR: &str = "db/migrations";

/// Default seeders directory (relative to project root)
pub const SEEDERS_DIR: &str = "db/seeders";

/// Tiller CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit ordering shared by both change sets
    pub ordering: OrderingSetting,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Schema migration change set
    pub migrations: ChangeSetConfig,

    /// Seed data change set
    pub seeders: ChangeSetConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the configuration for a working directory.
    ///
    /// An explicit path must exist. Otherwise `tiller.toml` in `cwd` is used
    /// when present, and built-in defaults when not.
    pub fn resolve(cwd: &Path, explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = cwd.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The section for a change set kind
    pub fn change_set(&self, kind: ChangeSetKind) -> &ChangeSetConfig {
        match kind {
            ChangeSetKind::Migrations => &self.migrations,
            ChangeSetKind::Seeders => &self.seeders,
        }
    }

    /// Build the runner configuration for a change set kind
    pub fn runner_config(&self, kind: ChangeSetKind) -> CliResult<RunnerConfig> {
        self.change_set(kind).runner_config(kind, self.ordering)
    }
}

/// The two change sets a project carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSetKind {
    /// Schema migrations
    Migrations,
    /// Reference and seed data
    Seeders,
}

impl ChangeSetKind {
    /// Default unit directory
    pub fn default_directory(&self) -> PathBuf {
        match self {
            Self::Migrations => PathBuf::from(MIGRATIONS_DIR),
            Self::Seeders => PathBuf::from(SEEDERS_DIR),
        }
    }

    /// Default ledger table
    pub fn default_ledger(&self) -> LedgerTable {
        match self {
            Self::Migrations => LedgerTable::migrations(),
            Self::Seeders => LedgerTable::seeders(),
        }
    }

    /// Singular noun for output
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Migrations => "migration",
            Self::Seeders => "seeder",
        }
    }
}

impl fmt::Display for ChangeSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Migrations => write!(f, "migrations"),
            Self::Seeders => write!(f, "seeders"),
        }
    }
}

/// Unit ordering as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingSetting {
    /// Sort by sequence number
    #[default]
    Numeric,
    /// Sort by raw file name
    Lexicographic,
}

impl From<OrderingSetting> for UnitOrdering {
    fn from(setting: OrderingSetting) -> Self {
        match setting {
            OrderingSetting::Numeric => UnitOrdering::Numeric,
            OrderingSetting::Lexicographic => UnitOrdering::Lexicographic,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,

    /// Busy timeout in milliseconds
    pub busy_timeout_ms: u64,

    /// Enable foreign key enforcement
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DATABASE_PATH),
            busy_timeout_ms: 5000,
            foreign_keys: true,
        }
    }
}

/// Overrides for one change set; unset fields use the kind's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSetConfig {
    /// Directory for change scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Ledger table name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Ledger timestamp column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_column: Option<String>,

    /// Recognized script extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl ChangeSetConfig {
    /// The effective unit directory
    pub fn directory(&self, kind: ChangeSetKind) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| kind.default_directory())
    }

    /// Build the runner configuration for this change set
    pub fn runner_config(
        &self,
        kind: ChangeSetKind,
        ordering: OrderingSetting,
    ) -> CliResult<RunnerConfig> {
        let defaults = kind.default_ledger();
        let ledger = LedgerTable::new(
            self.table_name.as_deref().unwrap_or(defaults.table()),
            self.timestamp_column
                .as_deref()
                .unwrap_or(defaults.timestamp_column()),
        )?;

        let mut config = RunnerConfig::new(self.directory(kind), ledger).ordering(ordering.into());
        if let Some(extensions) = &self.extensions {
            config = config.extensions(extensions.iter().cloned());
        }
        Ok(config)
    }
}
