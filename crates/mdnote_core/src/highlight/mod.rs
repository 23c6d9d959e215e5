//! Rule-based markdown highlighting.
//!
//! # Responsibility
//! - Map markdown syntax on a single line to styled spans for rendering.
//! - Keep the rule table explicit, ordered and immutable.

pub mod engine;
pub mod rules;
