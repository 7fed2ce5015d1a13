//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tiller CLI - Ordered, reversible schema migrations and seed data
#[derive(Parser, Debug)]
#[command(name = "tiller")]
#[command(version)]
#[command(about = "Tiller CLI - Ordered, reversible schema migrations and seed data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./tiller.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the config file
    #[arg(short, long, global = true, env = "TILLER_DATABASE")]
    pub database: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Schema migration commands
    Migrate(ChangeSetArgs),

    /// Seed data commands
    Seed(ChangeSetArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Migrate / Seed Commands
// =============================================================================

/// Arguments shared by `migrate` and `seed`
#[derive(Args, Debug)]
pub struct ChangeSetArgs {
    #[command(subcommand)]
    pub command: ChangeSetSubcommand,
}

/// Change set subcommands
#[derive(Subcommand, Debug)]
pub enum ChangeSetSubcommand {
    /// Apply all pending units in order
    Up(RunArgs),

    /// Revert all applied units in reverse order
    Down(DownArgs),

    /// Show applied and pending units
    Status(StatusArgs),
}

/// Arguments for `up`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the unit directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `down`
#[derive(Args, Debug)]
pub struct DownArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `status`
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the unit directory
    #[arg(long)]
    pub dir: Option<PathBuf>,
}
