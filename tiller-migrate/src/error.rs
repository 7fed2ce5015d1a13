//! Error types for the change runner.

use thiserror::Error;

/// Result type alias for runner operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur while discovering, resolving or running change units.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Bad directory, bad ledger naming or other setup problem.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A directory entry does not follow the `<n>_<snake_case>.<ext>` convention.
    #[error("Invalid change unit name '{name}': {reason}")]
    InvalidUnitName {
        /// The offending file name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No executable unit could be resolved for a discovered file.
    #[error("No change unit registered as '{0}'")]
    UnitNotFound(String),

    /// The unit has no reverse operation.
    #[error("Change unit '{0}' cannot be reverted")]
    IrreversibleUnit(String),

    /// Database operation error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another runner holds the database write lock.
    #[error("Failed to acquire the ledger lock: {0}")]
    LockConflict(String),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// General runner error.
    #[error("Migration error: {0}")]
    Other(String),
}

impl MigrationError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid unit name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUnitName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a lock conflict error.
    pub fn lock_conflict(msg: impl Into<String>) -> Self {
        Self::LockConflict(msg.into())
    }

    /// Create an other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Map a failure to begin a unit transaction, promoting busy/locked
    /// database codes to [`MigrationError::LockConflict`].
    pub(crate) fn from_begin(err: rusqlite::Error, unit: &str) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                Self::LockConflict(format!("'{}': {}", unit, err))
            }
            _ => Self::Database(err),
        }
    }

    /// Check if this error was raised before any database mutation.
    ///
    /// Configuration problems are never worth retrying without an operator
    /// fixing the directory or the registry first.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidUnitName { .. } | Self::UnitNotFound(_)
        )
    }

    /// Check if re-running the same command may succeed unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LockConflict(_))
    }
}
