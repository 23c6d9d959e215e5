//! Core domain logic for mdnote.
//! This crate is the single source of truth for note, editor and link
//! invariants; UI shells only render what it reports.

pub mod buffer;
pub mod config;
pub mod db;
pub mod editor;
pub mod graph;
pub mod highlight;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use buffer::line_model::{BufferError, BufferEvent, LineModel, Position};
pub use config::{ConfigError, CoreConfig};
pub use editor::intent::{EditAction, EditIntent, EditOutcome, Selection};
pub use editor::structural::{EditError, EditorSettings, StructuralEditor};
pub use graph::note_graph::{GraphError, NoteEvent, NoteGraph};
pub use highlight::engine::{HighlightEngine, StyleSpan};
pub use highlight::rules::{HighlightStyle, TextAttributes};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use service::note_service::{EditorSession, NoteService, ServiceError};
pub use store::{JsonFileStore, NoteStore, SqliteNoteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
