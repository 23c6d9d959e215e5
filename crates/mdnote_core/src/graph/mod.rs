//! Note ownership and the wiki-link graph.
//!
//! # Responsibility
//! - Store notes by id and publish change events to collaborators.
//! - Derive links and backlinks from note content on demand.
//!
//! # Invariants
//! - Links are recomputed from content; nothing about them is persisted.

pub mod links;
pub mod note_graph;
