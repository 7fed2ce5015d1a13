//! `tiller migrate` command - Apply, revert and inspect schema migrations.

use tiller_migrate::UnitRegistry;

use crate::cli::ChangeSetArgs;
use crate::commands::{Context, change_set};
use crate::config::ChangeSetKind;
use crate::error::CliResult;

/// Run the migrate command
pub fn run(args: &ChangeSetArgs, ctx: &Context, registry: &UnitRegistry) -> CliResult<()> {
    change_set::run(ChangeSetKind::Migrations, args, ctx, registry)
}
