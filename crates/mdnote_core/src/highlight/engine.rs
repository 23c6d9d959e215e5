//! Per-line highlight evaluation.
//!
//! # Invariants
//! - Output depends only on the line passed in; no state crosses lines.
//! - Spans are emitted in rule order, then match order; overlapping spans
//!   are neither merged nor deduplicated.
//! - Offsets and lengths are counted in characters.

use crate::highlight::rules::{markdown_rules, HighlightRule, HighlightStyle};
use serde::Serialize;

/// A styled character range on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleSpan {
    pub start: usize,
    pub len: usize,
    pub style: HighlightStyle,
}

/// Immutable, ordered set of highlight rules.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    rules: Vec<HighlightRule>,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::markdown()
    }
}

impl HighlightEngine {
    /// Creates an engine that evaluates `rules` in the given order.
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    /// Engine with the built-in markdown rule table.
    pub fn markdown() -> Self {
        Self::new(markdown_rules())
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    /// Returns every span produced by every rule for `line`.
    pub fn highlight_line(&self, line: &str) -> Vec<StyleSpan> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for found in rule.pattern().find_iter(line) {
                if found.is_empty() {
                    continue;
                }
                spans.push(StyleSpan {
                    start: line[..found.start()].chars().count(),
                    len: found.as_str().chars().count(),
                    style: rule.style(),
                });
            }
        }
        spans
    }

    /// Highlights a whole document, one span list per `\n`-separated line.
    pub fn highlight_text(&self, text: &str) -> Vec<Vec<StyleSpan>> {
        text.split('\n')
            .map(|line| self.highlight_line(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{HighlightEngine, StyleSpan};
    use crate::highlight::rules::{HighlightRule, HighlightStyle};

    fn span(start: usize, len: usize, style: HighlightStyle) -> StyleSpan {
        StyleSpan { start, len, style }
    }

    #[test]
    fn plain_line_has_no_spans() {
        let engine = HighlightEngine::markdown();
        assert!(engine.highlight_line("nothing to see").is_empty());
    }

    #[test]
    fn custom_rule_order_is_respected() {
        let engine = HighlightEngine::new(vec![
            HighlightRule::new("b", HighlightStyle::Bold).unwrap(),
            HighlightRule::new("a", HighlightStyle::Italic).unwrap(),
        ]);
        assert_eq!(
            engine.highlight_line("ab"),
            vec![
                span(1, 1, HighlightStyle::Bold),
                span(0, 1, HighlightStyle::Italic)
            ]
        );
    }

    #[test]
    fn offsets_are_counted_in_chars() {
        let engine = HighlightEngine::markdown();
        assert_eq!(
            engine.highlight_line("é `x`"),
            vec![span(2, 3, HighlightStyle::InlineCode)]
        );
    }

    #[test]
    fn highlight_text_returns_one_entry_per_line() {
        let engine = HighlightEngine::markdown();
        let lines = engine.highlight_text("# A\nplain\n> q");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![span(0, 3, HighlightStyle::Heading1)]);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2], vec![span(0, 3, HighlightStyle::BlockQuote)]);
    }
}
