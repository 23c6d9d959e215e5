//! Structural markdown editing.
//!
//! # Responsibility
//! - Model editing gestures as plain values (`EditIntent`).
//! - Apply them to a `LineModel` so plain markdown behaves like an outliner.

pub mod intent;
pub mod structural;
