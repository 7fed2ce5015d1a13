//! `tiller seed` command - Load and unload seed data.
//!
//! Seeders use their own directory and ledger table (`seeders` /
//! `seed_date` by default), so they can be reverted without touching the
//! schema.

use tiller_migrate::UnitRegistry;

use crate::cli::ChangeSetArgs;
use crate::commands::{Context, change_set};
use crate::config::ChangeSetKind;
use crate::error::CliResult;

/// Run the seed command
pub fn run(args: &ChangeSetArgs, ctx: &Context, registry: &UnitRegistry) -> CliResult<()> {
    change_set::run(ChangeSetKind::Seeders, args, ctx, registry)
}
