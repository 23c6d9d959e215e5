//! In-memory note collection with link queries.
//!
//! # Responsibility
//! - Own every `Note`, keyed by id.
//! - Answer lookup, listing, search and backlink queries.
//! - Publish one `NoteEvent` per successful mutating call.
//!
//! # Invariants
//! - Every key is non-empty and equals the id of the note stored under it.
//! - Missing ids surface as `None` / `GraphError::NotFound`, never as a
//!   placeholder note.
//! - Backlinks are title-based: renaming a note breaks links that still use
//!   the old title, and deleting a note leaves dangling links untouched.

use crate::graph::links::{extract_links, links_to};
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::search::scan::search_notes;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};

const WELCOME_TITLE: &str = "Welcome to YD-Notes";
const WELCOME_CONTENT: &str = "# Welcome to YD-Notes\n\n\
This is your first note. You can edit it to get started.\n\n\
## Features\n\n\
- Bullet lists\n\
- Nested lists\n  - Like this one\n  - And this one\n\
- Markdown formatting\n\
- Wiki-style links: [[Another Note]]\n\n\
## Tips\n\n\
- Use **bold** for emphasis\n\
- Use *italic* for subtle emphasis\n\
- Use `code` for inline code\n\
- Use # for headings\n\
- Use [[brackets]] for page links\n";

pub type GraphResult<T> = Result<T, GraphError>;

/// Change notification published by [`NoteGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Added(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
    /// The whole collection was replaced (load from storage).
    Reloaded,
}

/// Error for note graph mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    NotFound(NoteId),
    DuplicateId(NoteId),
    Validation(NoteValidationError),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate note id: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<NoteValidationError> for GraphError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Collection of notes indexed by id.
#[derive(Debug, Default)]
pub struct NoteGraph {
    notes: BTreeMap<NoteId, Note>,
    subscribers: Vec<Sender<NoteEvent>>,
}

impl NoteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph seeded with the first-run welcome note.
    pub fn with_welcome_note() -> Self {
        let mut graph = Self::new();
        let mut welcome = Note::new(WELCOME_TITLE);
        welcome.set_content(WELCOME_CONTENT);
        graph.notes.insert(welcome.id().to_string(), welcome);
        graph
    }

    /// Registers a subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<NoteEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    /// Adds `note`, assigning a generated id when its id is blank.
    ///
    /// # Errors
    /// - Returns [`GraphError::DuplicateId`] when the id is already present.
    pub fn add(&mut self, mut note: Note) -> GraphResult<NoteId> {
        note.ensure_id();
        note.validate()?;
        let id = note.id().to_string();
        if self.notes.contains_key(&id) {
            warn!("event=note_add module=graph status=error error_code=duplicate_id note_id={id}");
            return Err(GraphError::DuplicateId(id));
        }

        self.notes.insert(id.clone(), note);
        info!("event=note_add module=graph status=ok note_id={id}");
        self.publish(NoteEvent::Added(id.clone()));
        Ok(id)
    }

    /// Creates a note titled `title` (content seeded with its heading).
    pub fn create_note(&mut self, title: impl Into<String>) -> GraphResult<NoteId> {
        self.add(Note::new(title))
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Replaces the stored note with the same id and refreshes `updated_at`.
    ///
    /// # Errors
    /// - Returns [`GraphError::NotFound`] for unknown ids.
    pub fn update(&mut self, mut note: Note) -> GraphResult<()> {
        let id = note.id().to_string();
        let Some(slot) = self.notes.get_mut(&id) else {
            return Err(GraphError::NotFound(id));
        };
        note.touch();
        *slot = note;
        info!("event=note_update module=graph status=ok note_id={id}");
        self.publish(NoteEvent::Updated(id));
        Ok(())
    }

    /// Replaces the content of note `id`.
    ///
    /// # Errors
    /// - Returns [`GraphError::NotFound`] for unknown ids.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> GraphResult<()> {
        let mut note = self.cloned(id)?;
        note.set_content(content);
        self.update(note)
    }

    /// Renames note `id`. Existing links to the old title are not rewritten.
    ///
    /// # Errors
    /// - Returns [`GraphError::NotFound`] for unknown ids.
    pub fn set_title(&mut self, id: &str, title: impl Into<String>) -> GraphResult<()> {
        let mut note = self.cloned(id)?;
        note.set_title(title);
        self.update(note)
    }

    /// Removes note `id` and returns it.
    ///
    /// # Errors
    /// - Returns [`GraphError::NotFound`] for unknown ids.
    pub fn delete(&mut self, id: &str) -> GraphResult<Note> {
        let Some(removed) = self.notes.remove(id) else {
            return Err(GraphError::NotFound(id.to_string()));
        };
        info!("event=note_delete module=graph status=ok note_id={id}");
        self.publish(NoteEvent::Deleted(id.to_string()));
        Ok(removed)
    }

    /// Every note, in id order.
    pub fn list_all(&self) -> Vec<&Note> {
        self.notes.values().collect()
    }

    /// Every note sorted for display: case-insensitive title, then id.
    pub fn list_by_title(&self) -> Vec<&Note> {
        let mut notes = self.list_all();
        notes.sort_by(|a, b| {
            a.title()
                .to_lowercase()
                .cmp(&b.title().to_lowercase())
                .then_with(|| a.id().cmp(b.id()))
        });
        notes
    }

    /// Notes whose title or content contains `query`, ignoring case.
    ///
    /// An empty query returns every note. Results are in id order.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        search_notes(self.notes.values(), query)
    }

    /// Ids of the other notes whose content contains `[[<title of id>]]`.
    ///
    /// Returns an empty list when `id` is unknown.
    pub fn backlinks_of(&self, id: &str) -> Vec<NoteId> {
        let Some(target) = self.notes.get(id) else {
            return Vec::new();
        };
        let backlinks: Vec<NoteId> = self
            .notes
            .values()
            .filter(|note| note.id() != id && links_to(note.content(), target.title()))
            .map(|note| note.id().to_string())
            .collect();
        debug!(
            "event=backlinks module=graph status=ok note_id={id} count={}",
            backlinks.len()
        );
        backlinks
    }

    /// Parses every `[[title]]` in `content`, in order of appearance.
    pub fn extract_links(content: &str) -> Vec<String> {
        extract_links(content)
    }

    /// Outgoing wiki link titles of note `id`.
    pub fn links_of(&self, id: &str) -> Option<Vec<String>> {
        self.notes.get(id).map(|note| extract_links(note.content()))
    }

    /// First note (in id order) whose title equals `title` exactly.
    pub fn find_by_title(&self, title: &str) -> Option<&Note> {
        self.notes.values().find(|note| note.title() == title)
    }

    /// Clones of every note, in id order, for persistence.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }

    /// Replaces the whole collection atomically.
    ///
    /// Every note is validated before anything is swapped; on error the
    /// current collection is left untouched.
    ///
    /// # Errors
    /// - Returns [`GraphError::Validation`] for blank ids.
    /// - Returns [`GraphError::DuplicateId`] when two notes share an id.
    pub fn replace_all(&mut self, notes: Vec<Note>) -> GraphResult<()> {
        let mut seen = BTreeSet::new();
        for note in &notes {
            note.validate()?;
            if !seen.insert(note.id()) {
                return Err(GraphError::DuplicateId(note.id().to_string()));
            }
        }

        self.notes = notes
            .into_iter()
            .map(|note| (note.id().to_string(), note))
            .collect();
        info!(
            "event=notes_reload module=graph status=ok count={}",
            self.notes.len()
        );
        self.publish(NoteEvent::Reloaded);
        Ok(())
    }

    fn cloned(&self, id: &str) -> GraphResult<Note> {
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    fn publish(&mut self, event: NoteEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
