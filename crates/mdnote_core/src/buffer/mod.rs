//! Editable text storage.
//!
//! # Responsibility
//! - Hold the markdown being edited as lines.
//! - Separate programmatic replacement from edit notifications.

pub mod line_model;
