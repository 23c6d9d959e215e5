//! Note search entry points.
//!
//! # Responsibility
//! - Keep query matching rules in one place for the note graph and callers.

pub mod scan;
