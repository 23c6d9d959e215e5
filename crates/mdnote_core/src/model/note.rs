//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical record owned by the note graph.
//! - Keep timestamp bookkeeping next to the mutations that require it.
//!
//! # Invariants
//! - `id` is non-empty and never changes after creation.
//! - `updated_at` is refreshed on every content mutation.
//! - Serialized field names match the persisted document shape
//!   (`id`, `title`, `content`, `createdAt`, `updatedAt`).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, unique note identifier.
///
/// Generated ids are hyphenated UUID v4 strings; persisted ids from other
/// sources are accepted as long as they are non-empty.
pub type NoteId = String;

/// Offset-less ISO-8601 form, as written by local-time serializers.
const OFFSETLESS_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Title used when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Validation error for note invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// The note id is empty (or whitespace only).
    EmptyId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "note id must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// One markdown note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with a generated id.
    ///
    /// Content is seeded with a level-1 heading carrying the title, followed
    /// by one blank line.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let content = format!("# {title}\n\n");
        Self::with_id(generate_note_id(), title, content)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used by load/import paths where identity already exists. Both
    /// timestamps are set to now; use [`Note::with_timestamps`] to restore
    /// persisted values.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces both timestamps, typically with persisted values.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the note.
    ///
    /// Wiki links elsewhere that point at the previous title are not
    /// rewritten; they stop resolving to this note.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the markdown body and refreshes `updated_at`.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Refreshes `updated_at` to the current time.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Assigns a generated id when the current one is empty.
    ///
    /// Returns `true` when an id was assigned.
    pub(crate) fn ensure_id(&mut self) -> bool {
        if self.id.trim().is_empty() {
            self.id = generate_note_id();
            return true;
        }
        false
    }

    /// Checks note invariants.
    ///
    /// # Errors
    /// - Returns [`NoteValidationError::EmptyId`] when `id` is blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        Ok(())
    }
}

/// Parses an ISO-8601 timestamp.
///
/// RFC 3339 values keep their offset. Values without an offset are read as
/// UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|err| {
            NaiveDateTime::parse_from_str(value, OFFSETLESS_TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(|_| err)
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Returns a fresh collision-resistant note id.
pub fn generate_note_id() -> NoteId {
    Uuid::new_v4().to_string()
}
