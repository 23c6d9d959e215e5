//! JSON document note store.
//!
//! Document shape:
//! `{"notes":[{"id","title","content","createdAt","updatedAt"}, ...]}` with
//! ISO-8601 (RFC 3339) timestamps.
//!
//! # Invariants
//! - Saves write a sibling temp file and rename it over the target, so a
//!   failed save never truncates the previous document.

use crate::model::note::Note;
use crate::store::{check_records, NoteStore, StoreError, StoreResult};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Serialize)]
struct NotesDocument<'a> {
    notes: &'a [Note],
}

/// Stores all notes in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, notes: &[Note]) -> StoreResult<()> {
        let payload = serde_json::to_vec_pretty(&NotesDocument { notes })
            .map_err(|err| StoreError::MalformedDocument(err.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, payload)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl NoteStore for JsonFileStore {
    fn save_all(&mut self, notes: &[Note]) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(notes) {
            Ok(()) => {
                info!(
                    "event=notes_save module=store status=ok backend=json count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_save module=store status=error backend=json error={err}"
                );
                Err(err)
            }
        }
    }

    fn load_all(&self) -> StoreResult<Vec<Note>> {
        let raw = fs::read(&self.path)?;
        let notes = parse_notes_document(&raw).map_err(|err| {
            error!("event=notes_load module=store status=error backend=json error={err}");
            err
        })?;
        info!(
            "event=notes_load module=store status=ok backend=json count={}",
            notes.len()
        );
        Ok(notes)
    }
}

/// Decodes a notes document; any bad record fails the whole document.
pub fn parse_notes_document(raw: &[u8]) -> StoreResult<Vec<Note>> {
    let root: Value = serde_json::from_slice(raw)
        .map_err(|err| StoreError::MalformedDocument(err.to_string()))?;
    let records = root
        .get("notes")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::MalformedDocument("missing `notes` array".to_string()))?;

    let notes = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Note>(record.clone()).map_err(|err| {
                StoreError::MalformedRecord {
                    index,
                    message: err.to_string(),
                }
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    check_records(&notes)?;
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::parse_notes_document;
    use crate::store::StoreError;

    #[test]
    fn parses_offset_timestamps_as_utc() {
        let raw = br#"{"notes":[{"id":"a1","title":"Intro","content":"see [[Guide]]",
            "createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-02T11:30:00+02:00"}]}"#;
        let notes = parse_notes_document(raw).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id(), "a1");
        assert_eq!(
            notes[0].updated_at().to_rfc3339(),
            "2024-03-02T09:30:00+00:00"
        );
    }

    #[test]
    fn parses_local_timestamps_without_offset() {
        let raw = br#"{"notes":[{"id":"a","title":"A","content":"x",
            "createdAt":"2024-03-01T10:00:00","updatedAt":"2024-03-01T10:05:30"}]}"#;
        let notes = parse_notes_document(raw).unwrap();
        assert_eq!(
            notes[0].created_at().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
        assert_eq!(
            notes[0].updated_at().to_rfc3339(),
            "2024-03-01T10:05:30+00:00"
        );
    }

    #[test]
    fn bad_timestamp_reports_record_index() {
        let raw = br#"{"notes":[
            {"id":"a","title":"","content":"","createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:00Z"},
            {"id":"b","title":"","content":"","createdAt":"yesterday","updatedAt":"2024-03-01T10:00:00Z"}]}"#;
        let err = parse_notes_document(raw).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { index: 1, .. }), "{err}");
    }

    #[test]
    fn missing_notes_array_is_malformed_document() {
        let err = parse_notes_document(br#"{"pages":[]}"#).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));
    }

    #[test]
    fn blank_id_is_rejected() {
        let raw = br#"{"notes":[{"id":"","title":"","content":"","createdAt":"2024-03-01T10:00:00Z","updatedAt":"2024-03-01T10:00:00Z"}]}"#;
        let err = parse_notes_document(raw).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { index: 0, .. }));
    }
}
