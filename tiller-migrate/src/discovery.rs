//! Change unit discovery.
//!
//! The unit directory is the single source of truth for the set of known
//! units. It is read fresh on every run; nothing is cached between runs.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{MigrateResult, MigrationError};
use crate::naming::parse_file_name;

/// Extensions recognized as change script artifacts by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["sql", "rs"];

/// How discovered units are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitOrdering {
    /// By parsed sequence number, ties broken by file name.
    #[default]
    Numeric,
    /// By raw file name. `20_x` sorts before `3_x`; only use this when an
    /// existing deployment depends on it.
    Lexicographic,
}

/// A change script found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDescriptor {
    /// On-disk file name, e.g. `3_add_index_to_table_one.sql`.
    pub file_name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Parsed numeric prefix.
    pub sequence: u64,
    /// PascalCase name used to resolve the executable unit.
    pub unit_name: String,
    /// File extension, without the dot.
    pub extension: String,
}

impl UnitDescriptor {
    /// The ledger key for this unit.
    ///
    /// `.` components, repeated separators and trailing separators are
    /// dropped, so `db/seeders`, `./db/seeders/` and `db/./seeders` key the
    /// same file identically. The path is not canonicalized: an absolute
    /// and a relative spelling of one directory remain distinct keys.
    pub fn unit_path(&self) -> String {
        normalize(&self.path).display().to_string()
    }
}

/// Options controlling a discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Recognized file extensions.
    pub extensions: Vec<String>,
    /// Ordering of the result.
    pub ordering: UnitOrdering,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            ordering: UnitOrdering::Numeric,
        }
    }
}

/// List the change units in `dir`, validated and ordered.
///
/// Any entry that is a regular file and does not follow the naming
/// convention fails the whole call. Directories and other non-file entries
/// are ignored.
pub fn discover(dir: &Path, options: &DiscoveryOptions) -> MigrateResult<Vec<UnitDescriptor>> {
    let metadata = std::fs::metadata(dir).map_err(|e| {
        MigrationError::configuration(format!(
            "unit directory '{}' is not accessible: {}",
            dir.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(MigrationError::configuration(format!(
            "unit path '{}' is not a directory",
            dir.display()
        )));
    }

    let mut units = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            trace!(path = %path.display(), "Skipping non-file entry");
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            return Err(MigrationError::invalid_name(
                file_name.to_string_lossy(),
                "file name is not valid UTF-8",
            ));
        };

        let parsed = parse_file_name(file_name, &options.extensions)?;
        units.push(UnitDescriptor {
            file_name: file_name.to_string(),
            path,
            sequence: parsed.sequence,
            unit_name: parsed.unit_name,
            extension: parsed.extension,
        });
    }

    check_unique_names(&units)?;
    sort_units(&mut units, options.ordering);

    debug!(
        dir = %dir.display(),
        count = units.len(),
        ordering = ?options.ordering,
        "Discovered change units"
    );

    Ok(units)
}

/// Lexical cleanup of a path; never touches the file system.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

fn sort_units(units: &mut [UnitDescriptor], ordering: UnitOrdering) {
    match ordering {
        UnitOrdering::Numeric => units.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then_with(|| a.file_name.cmp(&b.file_name))
        }),
        UnitOrdering::Lexicographic => units.sort_by(|a, b| a.file_name.cmp(&b.file_name)),
    }
}

/// Two files deriving the same unit name would resolve to the same unit.
fn check_unique_names(units: &[UnitDescriptor]) -> MigrateResult<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for unit in units {
        if let Some(previous) = seen.insert(&unit.unit_name, &unit.file_name) {
            let (first, second) = if previous < unit.file_name.as_str() {
                (previous, unit.file_name.as_str())
            } else {
                (unit.file_name.as_str(), previous)
            };
            return Err(MigrationError::configuration(format!(
                "'{}' and '{}' both derive the unit name '{}'",
                first, second, unit.unit_name
            )));
        }
    }
    Ok(())
}
