//! Domain model for notes.
//!
//! # Responsibility
//! - Define the canonical note record used by every core component.
//!
//! # Invariants
//! - Every note is identified by a stable, non-empty `NoteId`.
//! - Notes are owned by the note graph; editors work on copies.

pub mod note;
