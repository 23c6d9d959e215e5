//! Persistence collaborator contract and implementations.
//!
//! # Responsibility
//! - Define the save/load contract the note graph is persisted through.
//! - Provide a JSON document store and a SQLite store.
//!
//! # Invariants
//! - `load_all` either returns every record or fails; it never yields a
//!   partially decoded collection.
//! - Timestamps round-trip at full serialized precision.

use crate::db::DbError;
use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_store;
pub mod sqlite_store;

pub use json_store::JsonFileStore;
pub use sqlite_store::SqliteNoteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for persistence operations.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// The container (file or table) could not be decoded at all.
    MalformedDocument(String),
    /// One record could not be decoded or violates note invariants.
    MalformedRecord { index: usize, message: String },
    Db(DbError),
}

impl StoreError {
    /// Whether this error means "nothing has been saved yet".
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == std::io::ErrorKind::NotFound)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "note store i/o failed: {err}"),
            Self::MalformedDocument(message) => write!(f, "malformed notes document: {message}"),
            Self::MalformedRecord { index, message } => {
                write!(f, "malformed note record #{index}: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MalformedDocument(_) | Self::MalformedRecord { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Save/load contract for the whole note collection.
pub trait NoteStore {
    /// Persists `notes`, replacing whatever was stored before.
    fn save_all(&mut self, notes: &[Note]) -> StoreResult<()>;
    /// Loads every persisted note.
    fn load_all(&self) -> StoreResult<Vec<Note>>;
}

/// Rejects blank and repeated ids in a decoded collection.
pub(crate) fn check_records(notes: &[Note]) -> StoreResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for (index, note) in notes.iter().enumerate() {
        note.validate()
            .map_err(|err| StoreError::MalformedRecord {
                index,
                message: err.to_string(),
            })?;
        if !seen.insert(note.id()) {
            return Err(StoreError::MalformedRecord {
                index,
                message: format!("duplicate note id `{}`", note.id()),
            });
        }
    }
    Ok(())
}
