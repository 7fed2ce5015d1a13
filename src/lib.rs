//! # Tiller
//!
//! Ordered, idempotent and reversible schema changes and seed data for
//! SQLite.
//!
//! Tiller provides:
//! - File-name driven discovery of change units (`1_create_users_table.sql`)
//! - A ledger table recording which units have been applied
//! - One transaction per unit, so a failed run keeps everything before it
//! - Separate change sets for migrations and seeders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tiller::prelude::*;
//!
//! fn main() -> Result<(), MigrationError> {
//!     let mut conn = Connection::open("app.db")?;
//!     let registry = UnitRegistry::new();
//!
//!     let report = Runner::new(&mut conn, &registry, RunnerConfig::migrations("db/migrations"))
//!         .apply_all()?;
//!     println!("{}", report.summary());
//!
//!     Ok(())
//! }
//! ```
//!
//! Units written in Rust implement [`ChangeUnit`] and are registered under
//! the name derived from their file name:
//!
//! ```rust,ignore
//! struct BackfillTicketNumbers;
//!
//! impl ChangeUnit for BackfillTicketNumbers {
//!     fn apply(&mut self, conn: &Connection) -> MigrateResult<()> { /* ... */ }
//!     fn revert(&mut self, conn: &Connection) -> MigrateResult<()> { /* ... */ }
//! }
//!
//! // db/migrations/6_backfill_ticket_numbers.rs
//! registry.register("BackfillTicketNumbers", || BackfillTicketNumbers);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The migration engine.
pub mod migrate {
    pub use tiller_migrate::*;
}

/// The SQLite driver units are written against.
pub use rusqlite;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rusqlite::Connection;

    pub use crate::migrate::{
        ChangeUnit, Direction, LedgerTable, MigrateResult, MigrationError, RunReport, Runner,
        RunnerConfig, SqlScript, UnitOrdering, UnitRegistry,
    };
}

// Re-export key types at the crate root
pub use migrate::{ChangeUnit, MigrateResult, MigrationError, Runner, RunnerConfig, UnitRegistry};
