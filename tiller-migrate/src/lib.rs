//! # tiller-migrate
//!
//! Ordered, idempotent and reversible change runner for SQLite.
//!
//! This crate provides:
//! - Discovery of change scripts named `<sequence>_<snake_case>.<ext>`
//! - A registry mapping derived unit names to Rust change units
//! - Plain `.sql` scripts with `-- tiller:up` / `-- tiller:down` sections
//! - Ledger tables recording which units have been applied
//! - A runner applying pending units in order, or reverting applied units in
//!   reverse order, one transaction per unit
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌──────────────┐
//! │ Unit Dir     │────▶│ Discovery      │────▶│ Registry     │
//! └──────────────┘     └────────────────┘     └──────────────┘
//!                              │                     │
//!                              ▼                     ▼
//!                      ┌────────────────┐     ┌──────────────┐
//!                      │ Ledger Table   │◀───▶│ Runner       │
//!                      └────────────────┘     └──────────────┘
//! ```
//!
//! Schema migrations and seed data use the same runner with different
//! directories and ledger tables (`migrations` and `seeders`).
//!
//! ## Example
//!
//! ```rust,ignore
//! use rusqlite::Connection;
//! use tiller_migrate::{Runner, RunnerConfig, UnitRegistry};
//!
//! fn migrate() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = Connection::open("app.db")?;
//!     let registry = UnitRegistry::new();
//!
//!     let report = Runner::new(&mut conn, &registry, RunnerConfig::migrations("db/migrations"))
//!         .apply_all()?;
//!     println!("{}", report.summary());
//!
//!     Runner::new(&mut conn, &registry, RunnerConfig::seeders("db/seeders")).apply_all()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Unit Files
//!
//! ```text
//! db/migrations/
//! ├── 1_create_users_table.sql
//! ├── 2_create_tickets_table.sql
//! └── 3_backfill_ticket_numbers.rs     # registered as "BackfillTicketNumbers"
//! ```

pub mod discovery;
pub mod error;
pub mod ledger;
pub mod naming;
pub mod runner;
pub mod unit;

// Re-exports
pub use discovery::{DEFAULT_EXTENSIONS, DiscoveryOptions, UnitDescriptor, UnitOrdering, discover};
pub use error::{MigrateResult, MigrationError};
pub use ledger::{LedgerEntry, LedgerStore, LedgerTable};
pub use naming::{ParsedName, parse_file_name, unit_name};
pub use runner::{Direction, RunReport, RunStatus, Runner, RunnerConfig, UnitStatus};
pub use unit::{ChangeUnit, SqlScript, UnitRegistry};
