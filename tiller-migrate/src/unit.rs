//! Change units and their registry.
//!
//! A change unit is one self-contained, reversible database modification.
//! Units written in Rust are registered by name in a [`UnitRegistry`]; plain
//! `.sql` scripts need no registration and are loaded as [`SqlScript`]s.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::discovery::UnitDescriptor;
use crate::error::{MigrateResult, MigrationError};

/// Marker line opening the forward section of a SQL script.
pub const UP_MARKER: &str = "tiller:up";
/// Marker line opening the reverse section of a SQL script.
pub const DOWN_MARKER: &str = "tiller:down";

/// A single reversible change.
///
/// Both operations receive the connection of the transaction the runner
/// opened for this unit. Returning an error rolls that transaction back and
/// aborts the run.
pub trait ChangeUnit {
    /// Perform the forward change.
    fn apply(&mut self, conn: &Connection) -> MigrateResult<()>;

    /// Perform the exact inverse of [`ChangeUnit::apply`].
    fn revert(&mut self, conn: &Connection) -> MigrateResult<()>;

    /// Whether [`ChangeUnit::revert`] can succeed at all.
    ///
    /// Checked for every unit of a revert run before the first one executes.
    fn is_reversible(&self) -> bool {
        true
    }
}

/// A unit made of an up and a down SQL batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlScript {
    name: String,
    up: String,
    down: String,
}

impl SqlScript {
    /// Create a script from explicit up and down SQL.
    pub fn new(name: impl Into<String>, up: impl Into<String>, down: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up: up.into(),
            down: down.into(),
        }
    }

    /// Split script text on the `-- tiller:up` / `-- tiller:down` markers.
    ///
    /// Without an up marker, everything before the down marker (or the
    /// whole text) is the up section. With an up marker, text before it is
    /// ignored.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        enum Section {
            Preamble,
            Up,
            Down,
        }

        let has_up_marker = text.lines().any(|line| is_marker(line, UP_MARKER));
        let mut section = if has_up_marker {
            Section::Preamble
        } else {
            Section::Up
        };

        let mut up = String::new();
        let mut down = String::new();
        for line in text.lines() {
            if is_marker(line, UP_MARKER) {
                section = Section::Up;
                continue;
            }
            if is_marker(line, DOWN_MARKER) {
                section = Section::Down;
                continue;
            }
            let target = match section {
                Section::Preamble => continue,
                Section::Up => &mut up,
                Section::Down => &mut down,
            };
            target.push_str(line);
            target.push('\n');
        }

        Self::new(name, up.trim(), down.trim())
    }

    /// Read and parse a script file.
    pub fn load(path: &Path, name: impl Into<String>) -> MigrateResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(name, &text))
    }

    /// The unit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The forward SQL.
    pub fn up_sql(&self) -> &str {
        &self.up
    }

    /// The reverse SQL.
    pub fn down_sql(&self) -> &str {
        &self.down
    }

    /// Check whether a down section exists.
    pub fn is_reversible(&self) -> bool {
        !self.down.is_empty()
    }
}

impl ChangeUnit for SqlScript {
    fn apply(&mut self, conn: &Connection) -> MigrateResult<()> {
        conn.execute_batch(&self.up)?;
        Ok(())
    }

    fn revert(&mut self, conn: &Connection) -> MigrateResult<()> {
        if !self.is_reversible() {
            return Err(MigrationError::IrreversibleUnit(self.name.clone()));
        }
        conn.execute_batch(&self.down)?;
        Ok(())
    }

    fn is_reversible(&self) -> bool {
        SqlScript::is_reversible(self)
    }
}

fn is_marker(line: &str, marker: &str) -> bool {
    line.trim()
        .strip_prefix("--")
        .is_some_and(|rest| rest.trim().eq_ignore_ascii_case(marker))
}

type UnitFactory = Box<dyn Fn() -> Box<dyn ChangeUnit> + Send + Sync>;

/// Maps unit names to constructors.
///
/// ```rust,ignore
/// let mut registry = UnitRegistry::new();
/// registry.register("BackfillTicketNumbers", || BackfillTicketNumbers::default());
/// ```
#[derive(Default)]
pub struct UnitRegistry {
    factories: BTreeMap<String, UnitFactory>,
}

impl UnitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `name`, replacing any previous one.
    pub fn register<F, U>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> U + Send + Sync + 'static,
        U: ChangeUnit + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            warn!(unit = %name, "Replacing registered change unit");
        }
        self.factories
            .insert(name, Box::new(move || Box::new(factory()) as Box<dyn ChangeUnit>));
        self
    }

    /// Builder form of [`UnitRegistry::register`].
    pub fn with<F, U>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> U + Send + Sync + 'static,
        U: ChangeUnit + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Check if a unit name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered unit names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct the executable unit for a discovered file.
    ///
    /// Registered units take precedence; `.sql` files fall back to their
    /// own content.
    pub fn resolve(&self, descriptor: &UnitDescriptor) -> MigrateResult<Box<dyn ChangeUnit>> {
        if let Some(factory) = self.factories.get(&descriptor.unit_name) {
            debug!(unit = %descriptor.unit_name, "Resolved registered change unit");
            return Ok(factory());
        }

        if descriptor.extension.eq_ignore_ascii_case("sql") {
            debug!(unit = %descriptor.unit_name, path = %descriptor.path.display(), "Loading SQL script");
            let script = SqlScript::load(&descriptor.path, descriptor.unit_name.clone())?;
            return Ok(Box::new(script));
        }

        Err(MigrationError::UnitNotFound(format!(
            "{} (from {})",
            descriptor.unit_name, descriptor.file_name
        )))
    }
}

impl fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("units", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
