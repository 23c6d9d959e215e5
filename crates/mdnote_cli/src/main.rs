//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mdnote_core` linkage.
//! - Optionally load a JSON notes document and summarize its link graph.
//! - Keep output deterministic for quick local sanity checks.

use mdnote_core::{EditorSettings, JsonFileStore, NoteGraph, NoteService};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("mdnote_core ping={}", mdnote_core::ping());
    println!("mdnote_core version={}", mdnote_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let mut service = NoteService::new(JsonFileStore::new(&path), EditorSettings::default());
    let count = match service.load() {
        Ok(count) => count,
        Err(err) => {
            eprintln!("failed to load `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("notes={count}");
    let graph = service.graph();
    for note in graph.list_by_title() {
        println!(
            "{} title={:?} links={} backlinks={}",
            note.id(),
            note.title(),
            NoteGraph::extract_links(note.content()).len(),
            graph.backlinks_of(note.id()).len()
        );
    }
    ExitCode::SUCCESS
}
