//! The change runner.
//!
//! One generic runner serves both schema migrations and seed data; the two
//! differ only in directory and ledger table.
//!
//! Every executed unit gets its own `IMMEDIATE` transaction wrapping the
//! ledger check, the unit's `apply`/`revert`, and the ledger update. A unit
//! that fails leaves nothing behind and is not recorded; units that finished
//! before it stay committed, so the ledger is always an exact checkpoint of
//! completed work.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, error, info, warn};

use crate::discovery::{DEFAULT_EXTENSIONS, DiscoveryOptions, UnitDescriptor, UnitOrdering, discover};
use crate::error::{MigrateResult, MigrationError};
use crate::ledger::{LedgerEntry, LedgerStore, LedgerTable};
use crate::unit::{ChangeUnit, UnitRegistry};

/// Configuration for one runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the change scripts.
    pub directory: PathBuf,
    /// Ledger table tracking applied units.
    pub ledger: LedgerTable,
    /// Recognized script extensions.
    pub extensions: Vec<String>,
    /// Execution order.
    pub ordering: UnitOrdering,
    /// Report what would run without executing anything.
    pub dry_run: bool,
}

impl RunnerConfig {
    /// Create a configuration for an arbitrary directory and ledger.
    pub fn new(directory: impl Into<PathBuf>, ledger: LedgerTable) -> Self {
        Self {
            directory: directory.into(),
            ledger,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ordering: UnitOrdering::default(),
            dry_run: false,
        }
    }

    /// Schema migrations in `directory`, tracked in `migrations`.
    pub fn migrations(directory: impl Into<PathBuf>) -> Self {
        Self::new(directory, LedgerTable::migrations())
    }

    /// Seed data in `directory`, tracked in `seeders`.
    pub fn seeders(directory: impl Into<PathBuf>) -> Self {
        Self::new(directory, LedgerTable::seeders())
    }

    /// Set the execution order.
    pub fn ordering(mut self, ordering: UnitOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set the recognized extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Enable dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn discovery(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            extensions: self.extensions.clone(),
            ordering: self.ordering,
        }
    }
}

/// Which way a run goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply pending units in discovery order.
    Apply,
    /// Revert applied units in reverse discovery order.
    Revert,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply => write!(f, "apply"),
            Self::Revert => write!(f, "revert"),
        }
    }
}

/// Outcome of a completed run.
///
/// A failed run returns an error instead; there is no partial report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Direction of the run.
    pub direction: Direction,
    /// File names of units executed, in execution order. In dry-run mode,
    /// the units that would have been executed.
    pub executed: Vec<String>,
    /// File names of units left alone because the ledger already said so.
    pub skipped: Vec<String>,
    /// Wall time of the run in milliseconds.
    pub duration_ms: u128,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunReport {
    fn new(direction: Direction, dry_run: bool) -> Self {
        Self {
            direction,
            executed: Vec::new(),
            skipped: Vec::new(),
            duration_ms: 0,
            dry_run,
        }
    }

    /// Check if any unit ran.
    pub fn has_changes(&self) -> bool {
        !self.dry_run && !self.executed.is_empty()
    }

    /// A one-line summary.
    pub fn summary(&self) -> String {
        let verb = match (self.direction, self.dry_run) {
            (Direction::Apply, false) => "applied",
            (Direction::Revert, false) => "reverted",
            (Direction::Apply, true) => "would apply",
            (Direction::Revert, true) => "would revert",
        };

        if self.executed.is_empty() {
            return format!("Nothing to {}", self.direction);
        }

        let mut summary = format!("{} {}", self.executed.len(), verb);
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        format!("{} in {}ms", summary, self.duration_ms)
    }
}

/// Status of one discovered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    /// The discovered file.
    pub descriptor: UnitDescriptor,
    /// Ledger row, when applied.
    pub entry: Option<LedgerEntry>,
}

impl UnitStatus {
    /// Check if the unit is recorded as applied.
    pub fn is_applied(&self) -> bool {
        self.entry.is_some()
    }
}

/// Applied/pending overview of a unit directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatus {
    /// Every discovered unit, in execution order.
    pub units: Vec<UnitStatus>,
    /// Ledger rows with no matching file on disk.
    pub orphaned: Vec<LedgerEntry>,
}

impl RunStatus {
    /// Number of applied units.
    pub fn applied_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_applied()).count()
    }

    /// Number of pending units.
    pub fn pending_count(&self) -> usize {
        self.units.len() - self.applied_count()
    }
}

/// Applies and reverts the change units of one directory.
pub struct Runner<'a> {
    conn: &'a mut Connection,
    registry: &'a UnitRegistry,
    config: RunnerConfig,
}

impl<'a> Runner<'a> {
    /// Create a runner over an open connection.
    pub fn new(conn: &'a mut Connection, registry: &'a UnitRegistry, config: RunnerConfig) -> Self {
        Self {
            conn,
            registry,
            config,
        }
    }

    /// The runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The unit directory.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Apply every pending unit in discovery order.
    ///
    /// Units already in the ledger are skipped. The first failing unit
    /// aborts the run with its error unchanged.
    pub fn apply_all(&mut self) -> MigrateResult<RunReport> {
        self.run(Direction::Apply)
    }

    /// Revert every applied unit in reverse discovery order.
    pub fn revert_all(&mut self) -> MigrateResult<RunReport> {
        self.run(Direction::Revert)
    }

    /// Report applied and pending units without changing anything but the
    /// ledger table's existence.
    pub fn status(&self) -> MigrateResult<RunStatus> {
        let units = discover(&self.config.directory, &self.config.discovery())?;
        let ledger = self.ledger();
        ledger.ensure_table_exists()?;
        let entries = ledger.entries()?;

        let known: HashSet<String> = units.iter().map(UnitDescriptor::unit_path).collect();
        let orphaned = entries
            .iter()
            .filter(|e| !known.contains(&e.unit_path))
            .cloned()
            .collect();

        let units = units
            .into_iter()
            .map(|descriptor| {
                let path = descriptor.unit_path();
                let entry = entries.iter().find(|e| e.unit_path == path).cloned();
                UnitStatus { descriptor, entry }
            })
            .collect();

        Ok(RunStatus { units, orphaned })
    }

    fn ledger(&self) -> LedgerStore<'_> {
        LedgerStore::new(&*self.conn, &self.config.ledger)
    }

    fn run(&mut self, direction: Direction) -> MigrateResult<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::new(direction, self.config.dry_run);

        info!(
            dir = %self.config.directory.display(),
            ledger = self.config.ledger.table(),
            %direction,
            dry_run = self.config.dry_run,
            "Starting run"
        );

        let mut units = discover(&self.config.directory, &self.config.discovery())?;
        if direction == Direction::Revert {
            units.reverse();
        }

        let ledger = self.ledger();
        ledger.ensure_table_exists()?;

        let mut selected = Vec::new();
        for descriptor in units {
            let applied = ledger.is_applied(&descriptor.unit_path())?;
            let wanted = match direction {
                Direction::Apply => !applied,
                Direction::Revert => applied,
            };
            if wanted {
                selected.push(descriptor);
            } else {
                debug!(unit = %descriptor.file_name, %direction, "Skipping unit");
                report.skipped.push(descriptor.file_name);
            }
        }

        // Resolve everything up front so a missing or one-way unit aborts
        // before any database change.
        let mut resolved = Vec::with_capacity(selected.len());
        for descriptor in selected {
            let unit = self.registry.resolve(&descriptor)?;
            if direction == Direction::Revert && !unit.is_reversible() {
                error!(unit = %descriptor.file_name, "Unit has no revert, nothing reverted");
                return Err(MigrationError::IrreversibleUnit(descriptor.file_name));
            }
            resolved.push((descriptor, unit));
        }

        for (descriptor, unit) in resolved {
            if self.config.dry_run {
                info!(unit = %descriptor.file_name, %direction, "[DRY RUN] Would run unit");
                report.executed.push(descriptor.file_name);
                continue;
            }

            if self.run_unit(&descriptor, unit, direction)? {
                report.executed.push(descriptor.file_name);
            } else {
                report.skipped.push(descriptor.file_name);
            }
        }

        report.duration_ms = start.elapsed().as_millis();
        info!(summary = %report.summary(), "Run finished");
        Ok(report)
    }

    /// Run one unit inside its own transaction.
    ///
    /// Returns `false` if another runner handled the unit between the
    /// initial ledger scan and taking the write lock.
    fn run_unit(
        &mut self,
        descriptor: &UnitDescriptor,
        mut unit: Box<dyn ChangeUnit>,
        direction: Direction,
    ) -> MigrateResult<bool> {
        let unit_path = descriptor.unit_path();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| MigrationError::from_begin(e, &descriptor.file_name))?;

        let ledger = LedgerStore::new(&tx, &self.config.ledger);
        let applied = ledger.is_applied(&unit_path)?;
        let still_wanted = match direction {
            Direction::Apply => !applied,
            Direction::Revert => applied,
        };
        if !still_wanted {
            warn!(unit = %descriptor.file_name, %direction, "Unit handled by another runner, skipping");
            return Ok(false);
        }

        let start = Instant::now();
        let outcome = match direction {
            Direction::Apply => unit.apply(&tx),
            Direction::Revert => unit.revert(&tx),
        };
        if let Err(e) = outcome {
            error!(unit = %descriptor.file_name, %direction, error = %e, "Unit failed");
            return Err(e);
        }

        match direction {
            Direction::Apply => ledger.mark_applied(&unit_path)?,
            Direction::Revert => {
                ledger.mark_reverted(&unit_path)?;
            }
        }
        tx.commit()?;

        info!(
            unit = %descriptor.file_name,
            name = %descriptor.unit_name,
            %direction,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Unit completed"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::SqlScript;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Records calls and creates a marker table so effects are observable.
    struct Recording {
        name: &'static str,
        journal: Journal,
        fail_apply: bool,
    }

    impl ChangeUnit for Recording {
        fn apply(&mut self, conn: &Connection) -> MigrateResult<()> {
            self.journal.lock().unwrap().push(format!("apply {}", self.name));
            conn.execute_batch(&format!("CREATE TABLE {} (id INTEGER);", self.name))?;
            if self.fail_apply {
                return Err(MigrationError::other(format!("{} exploded", self.name)));
            }
            Ok(())
        }

        fn revert(&mut self, conn: &Connection) -> MigrateResult<()> {
            self.journal.lock().unwrap().push(format!("revert {}", self.name));
            conn.execute_batch(&format!("DROP TABLE {};", self.name))?;
            Ok(())
        }
    }

    fn unit_dir(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            std::fs::write(dir.path().join(file), "").unwrap();
        }
        dir
    }

    fn registry(journal: &Journal, failing: &[&'static str]) -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        for (unit, table) in [("A", "t_a"), ("B", "t_b"), ("C", "t_c")] {
            let journal = journal.clone();
            let fail_apply = failing.contains(&unit);
            registry.register(unit, move || Recording {
                name: table,
                journal: journal.clone(),
                fail_apply,
            });
        }
        registry
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    fn ledger_files(conn: &Connection, table: &LedgerTable) -> Vec<String> {
        LedgerStore::new(conn, table)
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| {
                Path::new(&e.unit_path)
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_apply_all_is_idempotent() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs", "3_c.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let first = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();
        assert_eq!(first.executed, vec!["1_a.rs", "2_b.rs", "3_c.rs"]);

        let second = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();
        assert!(second.executed.is_empty());
        assert_eq!(second.skipped.len(), 3);
        assert_eq!(journal.lock().unwrap().len(), 3);
        assert_eq!(
            ledger_files(&conn, &LedgerTable::migrations()),
            vec!["1_a.rs", "2_b.rs", "3_c.rs"]
        );
    }

    #[test]
    fn test_revert_all_runs_in_reverse() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs", "3_c.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let mut runner = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()));
        runner.apply_all().unwrap();
        let report = runner.revert_all().unwrap();

        assert_eq!(report.executed, vec!["3_c.rs", "2_b.rs", "1_a.rs"]);
        assert_eq!(
            journal.lock().unwrap()[3..].to_vec(),
            vec!["revert t_c", "revert t_b", "revert t_a"]
        );
        assert!(ledger_files(&conn, &LedgerTable::migrations()).is_empty());
        assert!(!table_exists(&conn, "t_a"));
    }

    #[test]
    fn test_failure_leaves_checkpoint() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs", "3_c.rs"]);
        let journal = Journal::default();
        let mut conn = Connection::open_in_memory().unwrap();

        let failing = registry(&journal, &["B"]);
        let err = Runner::new(&mut conn, &failing, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap_err();
        assert!(err.to_string().contains("t_b exploded"));
        assert_eq!(ledger_files(&conn, &LedgerTable::migrations()), vec!["1_a.rs"]);
        // The failed unit's own DDL was rolled back with its transaction.
        assert!(table_exists(&conn, "t_a"));
        assert!(!table_exists(&conn, "t_b"));

        journal.lock().unwrap().clear();
        let fixed = registry(&journal, &[]);
        let report = Runner::new(&mut conn, &fixed, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();
        assert_eq!(report.executed, vec!["2_b.rs", "3_c.rs"]);
        assert_eq!(report.skipped, vec!["1_a.rs"]);
        assert_eq!(*journal.lock().unwrap(), vec!["apply t_b", "apply t_c"]);
    }

    #[test]
    fn test_ledger_is_authoritative() {
        let dir = unit_dir(&["1_a.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let table = LedgerTable::migrations();
        let ledger = LedgerStore::new(&conn, &table);
        ledger.ensure_table_exists().unwrap();
        ledger
            .mark_applied(&dir.path().join("1_a.rs").display().to_string())
            .unwrap();

        let report = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();
        assert!(report.executed.is_empty());
        assert!(journal.lock().unwrap().is_empty());
        assert!(!table_exists(&conn, "t_a"));
    }

    #[test]
    fn test_invalid_name_applies_nothing() {
        let dir = unit_dir(&["1_a.rs", "01_add_index.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let err = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("01_add_index.rs"));
        assert!(journal.lock().unwrap().is_empty());
        assert!(!table_exists(&conn, "migrations"));
    }

    #[test]
    fn test_unregistered_unit_applies_nothing() {
        let dir = unit_dir(&["1_a.rs", "2_unknown.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let err = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap_err();
        assert!(matches!(err, MigrationError::UnitNotFound(_)));
        assert!(journal.lock().unwrap().is_empty());
    }

    #[test]
    fn test_revert_skips_never_applied() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let table = LedgerTable::migrations();
        {
            let ledger = LedgerStore::new(&conn, &table);
            ledger.ensure_table_exists().unwrap();
            ledger
                .mark_applied(&dir.path().join("1_a.rs").display().to_string())
                .unwrap();
        }
        conn.execute_batch("CREATE TABLE t_a (id INTEGER);").unwrap();

        let report = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .revert_all()
            .unwrap();
        assert_eq!(report.executed, vec!["1_a.rs"]);
        assert_eq!(report.skipped, vec!["2_b.rs"]);
        assert_eq!(*journal.lock().unwrap(), vec!["revert t_a"]);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let report = Runner::new(
            &mut conn,
            &registry,
            RunnerConfig::migrations(dir.path()).dry_run(true),
        )
        .apply_all()
        .unwrap();

        assert_eq!(report.executed, vec!["1_a.rs", "2_b.rs"]);
        assert!(!report.has_changes());
        assert!(report.summary().contains("would apply"));
        assert!(journal.lock().unwrap().is_empty());
        assert!(ledger_files(&conn, &LedgerTable::migrations()).is_empty());
    }

    #[test]
    fn test_sql_scripts_without_registration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("1_create_users.sql"),
            "-- tiller:up\nCREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT);\n-- tiller:down\nDROP TABLE users;\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("2_seed_admin.sql"),
            "INSERT INTO users (email) VALUES ('admin@example.com');\n-- tiller:down\nDELETE FROM users WHERE email = 'admin@example.com';\n",
        )
        .unwrap();

        let registry = UnitRegistry::new();
        let mut conn = Connection::open_in_memory().unwrap();
        let mut runner = Runner::new(&mut conn, &registry, RunnerConfig::seeders(dir.path()));
        runner.apply_all().unwrap();
        runner.revert_all().unwrap();

        assert!(!table_exists(&conn, "users"));
        assert!(ledger_files(&conn, &LedgerTable::seeders()).is_empty());
    }

    #[test]
    fn test_registered_unit_overrides_sql_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1_create_t.sql"), "THIS IS NOT SQL").unwrap();

        let registry = UnitRegistry::new().with("CreateT", || {
            SqlScript::new("CreateT", "CREATE TABLE t (id INTEGER);", "DROP TABLE t;")
        });
        let mut conn = Connection::open_in_memory().unwrap();
        Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();
        assert!(table_exists(&conn, "t"));
    }

    #[test]
    fn test_status() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let table = LedgerTable::migrations();
        {
            let ledger = LedgerStore::new(&conn, &table);
            ledger.ensure_table_exists().unwrap();
            ledger
                .mark_applied(&dir.path().join("1_a.rs").display().to_string())
                .unwrap();
            ledger.mark_applied("old/0_gone.rs").unwrap();
        }

        let runner = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()));
        let status = runner.status().unwrap();
        assert_eq!(status.applied_count(), 1);
        assert_eq!(status.pending_count(), 1);
        assert!(status.units[0].is_applied());
        assert!(!status.units[1].is_applied());
        assert_eq!(status.orphaned.len(), 1);
        assert_eq!(status.orphaned[0].unit_path, "old/0_gone.rs");
    }

    #[test]
    fn test_lock_conflict_between_runners() {
        let dir = unit_dir(&["1_a.rs"]);
        let db = tempfile::tempdir().unwrap();
        let db_path = db.path().join("app.db");
        let journal = Journal::default();
        let registry = registry(&journal, &[]);

        let mut conn = Connection::open(&db_path).unwrap();
        conn.busy_timeout(std::time::Duration::from_millis(10)).unwrap();
        LedgerStore::new(&conn, &LedgerTable::migrations())
            .ensure_table_exists()
            .unwrap();

        let holder = Connection::open(&db_path).unwrap();
        holder.execute_batch("BEGIN IMMEDIATE;").unwrap();

        let err = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap_err();
        assert!(
            matches!(err, MigrationError::LockConflict(_) | MigrationError::Database(_)),
            "unexpected error: {err}"
        );
        assert!(journal.lock().unwrap().is_empty());
        holder.execute_batch("ROLLBACK;").unwrap();
    }

    #[test]
    fn test_directory_spelling_does_not_reapply() {
        let dir = unit_dir(&["1_a.rs", "2_b.rs"]);
        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();

        let first = Runner::new(&mut conn, &registry, RunnerConfig::seeders(dir.path()))
            .apply_all()
            .unwrap();
        assert_eq!(first.executed.len(), 2);

        let dotted = dir.path().join(".");
        let second = Runner::new(&mut conn, &registry, RunnerConfig::seeders(&dotted))
            .apply_all()
            .unwrap();
        assert!(second.executed.is_empty());
        assert_eq!(second.skipped, vec!["1_a.rs", "2_b.rs"]);
        assert_eq!(journal.lock().unwrap().len(), 2);

        let status = Runner::new(&mut conn, &registry, RunnerConfig::seeders(&dotted))
            .status()
            .unwrap();
        assert_eq!(status.applied_count(), 2);
        assert!(status.orphaned.is_empty());
    }

    #[test]
    fn test_irreversible_unit_stops_revert_before_any_change() {
        let dir = unit_dir(&["1_a.rs"]);
        std::fs::write(
            dir.path().join("2_seed_defaults.sql"),
            "CREATE TABLE defaults (id INTEGER);",
        )
        .unwrap();
        std::fs::write(dir.path().join("3_c.rs"), "").unwrap();

        let journal = Journal::default();
        let registry = registry(&journal, &[]);
        let mut conn = Connection::open_in_memory().unwrap();
        Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .apply_all()
            .unwrap();

        let dry_run = RunnerConfig::migrations(dir.path()).dry_run(true);
        let err = Runner::new(&mut conn, &registry, dry_run)
            .revert_all()
            .unwrap_err();
        assert!(matches!(err, MigrationError::IrreversibleUnit(ref name) if name == "2_seed_defaults.sql"));

        let err = Runner::new(&mut conn, &registry, RunnerConfig::migrations(dir.path()))
            .revert_all()
            .unwrap_err();
        assert!(matches!(err, MigrationError::IrreversibleUnit(_)));

        assert_eq!(
            journal.lock().unwrap().clone(),
            vec!["apply t_a", "apply t_c"]
        );
        assert!(table_exists(&conn, "t_c"));
        assert_eq!(
            ledger_files(&conn, &LedgerTable::migrations()),
            vec!["1_a.rs", "2_seed_defaults.sql", "3_c.rs"]
        );
    }

    #[test]
    fn test_report_summary() {
        let mut report = RunReport::new(Direction::Apply, false);
        assert_eq!(report.summary(), "Nothing to apply");

        report.executed = vec!["1_a.rs".into(), "2_b.rs".into()];
        report.skipped = vec!["0_z.rs".into()];
        report.duration_ms = 12;
        assert_eq!(report.summary(), "2 applied, 1 skipped in 12ms");
        assert!(report.has_changes());
    }
}
