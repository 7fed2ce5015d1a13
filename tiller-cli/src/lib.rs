//! Tiller CLI - Command-line interface for Tiller migrations and seeders.
//!
//! The binary runs `.sql` change units against a SQLite database. Projects
//! with compiled-in Rust units build their own binary on top of this crate:
//!
//! ```no_run
//! use clap::Parser;
//! use tiller_cli::{cli::Cli, commands};
//!
//! let units = commands::Units::default();
//! // units.migrations.register("AddSearchIndex", || AddSearchIndex);
//! commands::run(Cli::parse(), &units).unwrap();
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
