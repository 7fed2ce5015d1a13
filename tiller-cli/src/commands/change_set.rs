//! `up`, `down` and `status` for either change set.
//!
//! `tiller migrate` and `tiller seed` differ only in which config section
//! and registry they hand to these functions.

use tiller_migrate::{Direction, RunReport, Runner, RunnerConfig, UnitRegistry};

use crate::cli::{ChangeSetArgs, ChangeSetSubcommand, DownArgs, RunArgs, StatusArgs};
use crate::commands::Context;
use crate::config::ChangeSetKind;
use crate::error::CliResult;
use crate::output::{self, Tone, UnitState};

/// Run a change set subcommand.
pub fn run(
    kind: ChangeSetKind,
    args: &ChangeSetArgs,
    ctx: &Context,
    registry: &UnitRegistry,
) -> CliResult<()> {
    match &args.command {
        ChangeSetSubcommand::Up(run_args) => run_up(kind, run_args, ctx, registry),
        ChangeSetSubcommand::Down(down_args) => run_down(kind, down_args, ctx, registry),
        ChangeSetSubcommand::Status(status_args) => run_status(kind, status_args, ctx, registry),
    }
}

fn runner_config(
    kind: ChangeSetKind,
    dir: Option<&std::path::Path>,
    dry_run: bool,
    ctx: &Context,
) -> CliResult<RunnerConfig> {
    let mut config = ctx.config.runner_config(kind)?.dry_run(dry_run);
    if let Some(dir) = dir {
        config.directory = dir.to_path_buf();
    }
    Ok(config)
}

fn print_context(config: &RunnerConfig, ctx: &Context) {
    output::field("Database", ctx.database.display());
    output::field("Directory", config.directory.display());
    output::field("Ledger", config.ledger.table());
    output::blank();
}

/// Apply all pending units.
fn run_up(
    kind: ChangeSetKind,
    args: &RunArgs,
    ctx: &Context,
    registry: &UnitRegistry,
) -> CliResult<()> {
    output::title(&format!("Apply {}", kind));

    let config = runner_config(kind, args.dir.as_deref(), args.dry_run, ctx)?;
    print_context(&config, ctx);

    let mut conn = ctx.open_database()?;
    let report = Runner::new(&mut conn, registry, config).apply_all()?;
    print_report(kind, &report);
    Ok(())
}

/// Revert all applied units.
fn run_down(
    kind: ChangeSetKind,
    args: &DownArgs,
    ctx: &Context,
    registry: &UnitRegistry,
) -> CliResult<()> {
    output::title(&format!("Revert {}", kind));

    let config = runner_config(kind, args.run.dir.as_deref(), args.run.dry_run, ctx)?;
    print_context(&config, ctx);

    if !args.force && !args.run.dry_run {
        let warning = format!("This will revert every applied {}.", kind.noun());
        output::message(Tone::Warn, &warning);
        output::blank();
        if !output::confirm("Are you sure you want to continue?") {
            output::blank();
            output::message(Tone::Info, "Revert cancelled.");
            return Ok(());
        }
        output::blank();
    }

    let mut conn = ctx.open_database()?;
    let report = Runner::new(&mut conn, registry, config).revert_all()?;
    print_report(kind, &report);
    Ok(())
}

/// Show applied and pending units.
fn run_status(
    kind: ChangeSetKind,
    args: &StatusArgs,
    ctx: &Context,
    registry: &UnitRegistry,
) -> CliResult<()> {
    output::title(&format!("{} status", capitalize(kind.noun())));

    let config = runner_config(kind, args.dir.as_deref(), false, ctx)?;
    print_context(&config, ctx);

    let mut conn = ctx.open_database()?;
    let status = Runner::new(&mut conn, registry, config).status()?;

    if status.units.is_empty() {
        output::message(Tone::Info, &format!("No {} found.", kind));
    }

    for unit in &status.units {
        let line = match &unit.entry {
            Some(entry) => {
                let applied_at = entry
                    .applied_at_utc()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| entry.applied_at.to_string());
                format!(
                    "{} {} ({})",
                    output::badge(UnitState::Applied),
                    unit.descriptor.file_name,
                    applied_at
                )
            }
            None => format!(
                "{} {}",
                output::badge(UnitState::Pending),
                unit.descriptor.file_name
            ),
        };
        output::item(&line);
    }

    if !status.orphaned.is_empty() {
        output::blank();
        let warning = format!(
            "{} ledger entries have no matching file:",
            status.orphaned.len()
        );
        output::message(Tone::Warn, &warning);
        for entry in &status.orphaned {
            output::item(&entry.unit_path);
        }
    }

    output::blank();
    output::field("Applied", status.applied_count());
    output::field("Pending", status.pending_count());
    Ok(())
}

fn print_report(kind: ChangeSetKind, report: &RunReport) {
    let verb = match report.direction {
        Direction::Apply => "Applied",
        Direction::Revert => "Reverted",
    };

    for file in &report.executed {
        let prefix = if report.dry_run { "[DRY RUN] " } else { "" };
        output::item(&format!("{}{} {}", prefix, verb, file));
    }
    if !report.skipped.is_empty() {
        output::note(&format!("  {} unchanged", report.skipped.len()));
    }

    output::blank();
    if report.executed.is_empty() {
        output::message(Tone::Success, &format!("No {} to {}.", kind, report.direction));
    } else {
        output::message(Tone::Success, &report.summary());
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
