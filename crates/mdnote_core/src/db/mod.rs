//! Storage backend for `SqliteNoteStore`.
//!
//! The note store keeps one `notes` table (id, title, content and two RFC 3339
//! timestamps). This module owns getting a connection into a state where that
//! table exists at the schema version this build expects.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied migration.
//! - A database stamped with a newer version is refused, never downgraded.
//! - Note rows are only touched through connections returned by `open_db*`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Failure while opening or migrating the notes database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build than this one.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Short machine-readable code for `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::UnsupportedSchemaVersion { .. } => "schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes database is at schema {db_version}, this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn newer_schema_error_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        assert_eq!(err.code(), "schema_too_new");
        let message = err.to_string();
        assert!(message.contains('7'));
        assert!(message.contains('1'));
    }

    #[test]
    fn sqlite_errors_keep_their_source() {
        let err = DbError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.code(), "sqlite");
        assert!(std::error::Error::source(&err).is_some());
    }
}
