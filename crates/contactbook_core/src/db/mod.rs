//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the contact store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write contact data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// File name used when callers only provide a data directory.
pub const DB_FILE_NAME: &str = "contactbook.sqlite3";

pub type DbResult<T> = Result<T, DbError>;

/// Returns the database file path inside `data_dir`.
pub fn db_path_in(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join(DB_FILE_NAME)
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Embedded schema steps are not numbered `1, 2, ..` in order.
    BrokenMigrationChain { expected: u32, found: u32 },
    /// `schema_migrations` does not account for every step up to
    /// `user_version`.
    MigrationHistoryMismatch {
        user_version: u32,
        recorded: Vec<u32>,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::BrokenMigrationChain { expected, found } => write!(
                f,
                "migration registry expected version {expected}, found {found}"
            ),
            Self::MigrationHistoryMismatch {
                user_version,
                recorded,
            } => write!(
                f,
                "schema version {user_version} does not match recorded migrations {recorded:?}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
