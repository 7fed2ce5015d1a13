//! CLI command implementations.

pub mod change_set;
pub mod migrate;
pub mod seed;
pub mod version;

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;
use tiller_migrate::UnitRegistry;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Compiled-in Rust change units, one registry per change set.
///
/// The stock `tiller` binary ships empty registries and runs `.sql` scripts
/// only. Applications embedding the CLI register their own units here.
#[derive(Debug, Default)]
pub struct Units {
    /// Units for `migrate`
    pub migrations: UnitRegistry,
    /// Units for `seed`
    pub seeders: UnitRegistry,
}

/// Shared state for one invocation.
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// Database path after CLI overrides
    pub database: PathBuf,
}

impl Context {
    /// Build the context from parsed arguments.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::resolve(&cwd, cli.config.as_deref())?;
        let database = cli
            .database
            .clone()
            .unwrap_or_else(|| config.database.path.clone());

        Ok(Self { config, database })
    }

    /// Open the configured database.
    pub fn open_database(&self) -> CliResult<Connection> {
        debug!(path = %self.database.display(), "Opening database");
        let conn = Connection::open(&self.database).map_err(|e| {
            CliError::Database(format!("Failed to open {}: {}", self.database.display(), e))
        })?;

        conn.busy_timeout(Duration::from_millis(self.config.database.busy_timeout_ms))?;
        if self.config.database.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }

        Ok(conn)
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli, units: &Units) -> CliResult<()> {
    match &cli.command {
        Command::Migrate(args) => {
            let ctx = Context::from_cli(&cli)?;
            migrate::run(args, &ctx, &units.migrations)
        }
        Command::Seed(args) => {
            let ctx = Context::from_cli(&cli)?;
            seed::run(args, &ctx, &units.seeders)
        }
        Command::Version => version::run(),
    }
}
