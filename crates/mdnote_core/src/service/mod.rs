//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate graph, store, editor and highlighter into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod note_service;
