//! Note use-case service.
//!
//! # Responsibility
//! - Wire the note graph to a persistence store.
//! - Open notes into editor buffers and write buffers back through the graph.
//!
//! # Invariants
//! - A failed load leaves the current graph untouched.
//! - Editor sessions hold a copy of the note content, never a reference into
//!   the graph; changes reach the graph only through `commit_editor`.
//! - Opening a note fills the buffer programmatically, so it publishes
//!   `BufferEvent::Replaced` rather than an edit.

use crate::buffer::line_model::{LineModel, Position};
use crate::editor::intent::{EditIntent, EditOutcome};
use crate::editor::structural::{EditError, EditorSettings, StructuralEditor};
use crate::graph::note_graph::{GraphError, NoteGraph};
use crate::highlight::engine::{HighlightEngine, StyleSpan};
use crate::model::note::{NoteId, DEFAULT_NOTE_TITLE};
use crate::store::{NoteStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Graph(GraphError),
    Store(StoreError),
    Edit(EditError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graph(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Graph(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Edit(err) => Some(err),
        }
    }
}

impl From<GraphError> for ServiceError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<EditError> for ServiceError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

/// A note opened for editing.
#[derive(Debug)]
pub struct EditorSession {
    note_id: NoteId,
    /// Editable copy of the note content.
    pub buffer: LineModel,
    /// Caret after the last applied intent.
    pub cursor: Position,
}

impl EditorSession {
    pub fn note_id(&self) -> &str {
        &self.note_id
    }
}

/// Note service facade over a graph and a store.
pub struct NoteService<S: NoteStore> {
    graph: NoteGraph,
    store: S,
    editor: StructuralEditor,
    highlighter: HighlightEngine,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service with an empty graph.
    pub fn new(store: S, settings: EditorSettings) -> Self {
        Self {
            graph: NoteGraph::new(),
            store,
            editor: StructuralEditor::new(settings),
            highlighter: HighlightEngine::markdown(),
        }
    }

    pub fn graph(&self) -> &NoteGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NoteGraph {
        &mut self.graph
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads every note from the store into the graph.
    ///
    /// When nothing has been persisted yet, the graph is seeded with the
    /// welcome note instead. Returns the number of notes now in the graph.
    ///
    /// # Errors
    /// - Returns [`ServiceError::Store`] for unreadable or malformed data; the
    ///   graph keeps its previous notes.
    pub fn load(&mut self) -> Result<usize, ServiceError> {
        let notes = match self.store.load_all() {
            Ok(notes) => notes,
            Err(err) if err.is_missing() => {
                info!("event=notes_load module=service status=ok source=welcome");
                NoteGraph::with_welcome_note().snapshot()
            }
            Err(err) => {
                warn!("event=notes_load module=service status=error error={err}");
                return Err(err.into());
            }
        };
        self.graph.replace_all(notes)?;
        Ok(self.graph.len())
    }

    /// Persists every note in the graph.
    pub fn save(&mut self) -> Result<(), ServiceError> {
        self.store.save_all(&self.graph.snapshot())?;
        Ok(())
    }

    /// Creates a note; a blank title falls back to the default title.
    pub fn create_note(&mut self, title: &str) -> Result<NoteId, ServiceError> {
        let title = match title.trim() {
            "" => DEFAULT_NOTE_TITLE,
            trimmed => trimmed,
        };
        Ok(self.graph.create_note(title)?)
    }

    /// Opens a copy of note `id` for editing, or `None` for unknown ids.
    pub fn open_editor(&self, id: &str) -> Option<EditorSession> {
        let note = self.graph.get(id)?;
        let mut buffer = LineModel::new();
        buffer.set_content(note.content());
        Some(EditorSession {
            note_id: note.id().to_string(),
            buffer,
            cursor: Position::default(),
        })
    }

    /// Applies `intent` to the session buffer and records the new caret.
    pub fn apply_edit(
        &self,
        session: &mut EditorSession,
        intent: &EditIntent,
    ) -> Result<EditOutcome, ServiceError> {
        let outcome = self.editor.apply(&mut session.buffer, intent)?;
        session.cursor = outcome.cursor;
        Ok(outcome)
    }

    /// Highlight spans for every line of the session buffer.
    pub fn highlight(&self, session: &EditorSession) -> Vec<Vec<StyleSpan>> {
        session
            .buffer
            .lines()
            .map(|line| self.highlighter.highlight_line(line))
            .collect()
    }

    /// Writes the session buffer back to its note.
    ///
    /// # Errors
    /// - Returns [`ServiceError::Graph`] with `NotFound` when the note was
    ///   deleted while the session was open.
    pub fn commit_editor(&mut self, session: &EditorSession) -> Result<(), ServiceError> {
        self.graph
            .set_content(&session.note_id, session.buffer.text())?;
        Ok(())
    }
}
