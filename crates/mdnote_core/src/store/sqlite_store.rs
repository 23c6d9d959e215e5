//! SQLite-backed note store.
//!
//! # Invariants
//! - `save_all` replaces the `notes` table contents in one transaction.
//! - Timestamps are stored as RFC 3339 text in UTC.
//! - Rows that fail to decode fail the whole load.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::note::{parse_timestamp as parse_iso_timestamp, Note};
use crate::store::{check_records, NoteStore, StoreError, StoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// Note store over a migrated SQLite connection.
#[derive(Debug)]
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection that already went through `open_db*`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SqliteNoteStore {
    fn write_rows(&mut self, notes: &[Note]) -> StoreResult<()> {
        check_records(notes)?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM notes;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO notes (id, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for note in notes {
                insert.execute(params![
                    note.id(),
                    note.title(),
                    note.content(),
                    format_timestamp(note.created_at()),
                    format_timestamp(note.updated_at()),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn read_rows(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at, updated_at
             FROM notes
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let index = notes.len();
            notes.push(parse_note_row(row, index)?);
        }
        check_records(&notes)?;
        Ok(notes)
    }
}

impl NoteStore for SqliteNoteStore {
    fn save_all(&mut self, notes: &[Note]) -> StoreResult<()> {
        match self.write_rows(notes) {
            Ok(()) => {
                info!(
                    "event=notes_save module=store status=ok backend=sqlite count={}",
                    notes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=notes_save module=store status=error backend=sqlite error={err}");
                Err(err)
            }
        }
    }

    fn load_all(&self) -> StoreResult<Vec<Note>> {
        match self.read_rows() {
            Ok(notes) => {
                info!(
                    "event=notes_load module=store status=ok backend=sqlite count={}",
                    notes.len()
                );
                Ok(notes)
            }
            Err(err) => {
                error!("event=notes_load module=store status=error backend=sqlite error={err}");
                Err(err)
            }
        }
    }
}

fn parse_note_row(row: &Row<'_>, index: usize) -> StoreResult<Note> {
    let id: String = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    let updated_text: String = row.get("updated_at")?;
    let created_at = parse_timestamp(&created_text, "created_at", index)?;
    let updated_at = parse_timestamp(&updated_text, "updated_at", index)?;

    Ok(
        Note::with_id(id, row.get::<_, String>("title")?, row.get::<_, String>("content")?)
            .with_timestamps(created_at, updated_at),
    )
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str, column: &str, index: usize) -> StoreResult<DateTime<Utc>> {
    parse_iso_timestamp(value).map_err(|err| StoreError::MalformedRecord {
        index,
        message: format!("invalid {column} `{value}`: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, parse_timestamp, SqliteNoteStore};
    use crate::model::note::Note;
    use crate::store::{NoteStore, StoreError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamps_round_trip_with_subsecond_precision() {
        let value = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let text = format_timestamp(value);
        assert!(text.ends_with('Z'));
        assert_eq!(parse_timestamp(&text, "created_at", 0).unwrap(), value);
    }

    #[test]
    fn invalid_timestamp_names_column() {
        let err = parse_timestamp("soon", "updated_at", 3).unwrap_err();
        assert!(err.to_string().contains("#3"));
        assert!(err.to_string().contains("updated_at"));
    }

    #[test]
    fn undecodable_row_fails_load() {
        let store = SqliteNoteStore::in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO notes (id, title, content, created_at, updated_at)
                 VALUES ('a', 'A', '', '2024-03-01T10:00:00Z', 'soon');",
                [],
            )
            .unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { index: 0, .. }), "{err}");
    }

    #[test]
    fn rejected_save_keeps_previous_rows() {
        let mut store = SqliteNoteStore::in_memory().unwrap();
        store.save_all(&[Note::with_id("a", "A", "")]).unwrap();

        let duplicate = [Note::with_id("b", "B", ""), Note::with_id("b", "C", "")];
        assert!(store.save_all(&duplicate).is_err());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn offsetless_timestamp_rows_load_as_utc() {
        let store = SqliteNoteStore::in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO notes (id, title, content, created_at, updated_at)
                 VALUES ('a', 'A', '', '2024-03-01T10:00:00', '2024-03-01T10:00:00');",
                [],
            )
            .unwrap();

        let notes = store.load_all().unwrap();
        assert_eq!(notes[0].created_at().to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }
}
