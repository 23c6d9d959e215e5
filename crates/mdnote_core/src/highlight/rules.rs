//! Highlight styles and the markdown rule table.
//!
//! # Invariants
//! - Rules are evaluated in table order; the order is part of the contract.
//! - Rule patterns are compiled once and never mutated afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Logical style assigned to a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStyle {
    Heading1,
    Heading2,
    Heading3,
    Bold,
    Italic,
    BulletMarker,
    InlineCode,
    Link,
    WikiLink,
    BlockQuote,
}

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Builds a colour from `0xRRGGBB`.
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

const INK: Rgb = Rgb::from_hex(0x1a_20_2c);
const MUTED: Rgb = Rgb::from_hex(0x4a_55_68);
const CODE_INK: Rgb = Rgb::from_hex(0x2d_37_48);
const CODE_PAPER: Rgb = Rgb::from_hex(0xf7_fa_fc);
const LINK_BLUE: Rgb = Rgb::from_hex(0x31_82_ce);

/// Visual attributes a renderer applies for a style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextAttributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub monospace: bool,
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    /// Font size override in points.
    pub point_size: Option<u8>,
}

impl HighlightStyle {
    /// Default light-theme attributes for this style.
    pub fn attributes(self) -> TextAttributes {
        let heading = |size| TextAttributes {
            bold: true,
            foreground: Some(INK),
            point_size: Some(size),
            ..TextAttributes::default()
        };
        match self {
            Self::Heading1 => heading(16),
            Self::Heading2 => heading(14),
            Self::Heading3 => heading(12),
            Self::Bold => TextAttributes {
                bold: true,
                foreground: Some(INK),
                ..TextAttributes::default()
            },
            Self::Italic => TextAttributes {
                italic: true,
                ..TextAttributes::default()
            },
            Self::BulletMarker => TextAttributes {
                bold: true,
                foreground: Some(MUTED),
                ..TextAttributes::default()
            },
            Self::InlineCode => TextAttributes {
                monospace: true,
                foreground: Some(CODE_INK),
                background: Some(CODE_PAPER),
                ..TextAttributes::default()
            },
            Self::Link | Self::WikiLink => TextAttributes {
                underline: true,
                foreground: Some(LINK_BLUE),
                ..TextAttributes::default()
            },
            Self::BlockQuote => TextAttributes {
                italic: true,
                foreground: Some(MUTED),
                ..TextAttributes::default()
            },
        }
    }
}

/// One pattern-to-style mapping.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    style: HighlightStyle,
}

impl HighlightRule {
    /// Compiles `pattern` into a rule.
    ///
    /// # Errors
    /// - Returns the regex compile error for invalid patterns.
    pub fn new(pattern: &str, style: HighlightStyle) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            style,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn style(&self) -> HighlightStyle {
        self.style
    }
}

const MARKDOWN_RULE_TABLE: &[(&str, HighlightStyle)] = &[
    (r"^#\s+.+$", HighlightStyle::Heading1),
    (r"^##\s+.+$", HighlightStyle::Heading2),
    (r"^###\s+.+$", HighlightStyle::Heading3),
    (r"\*\*(.+?)\*\*", HighlightStyle::Bold),
    (r"\*(.+?)\*", HighlightStyle::Italic),
    (r"^\s*[-*+]\s+", HighlightStyle::BulletMarker),
    (r"`([^`]+)`", HighlightStyle::InlineCode),
    (r"\[([^\[\]]+)\]\(([^()]+)\)", HighlightStyle::Link),
    (r"\[\[([^\[\]]+)\]\]", HighlightStyle::WikiLink),
    (r"^>\s+.+$", HighlightStyle::BlockQuote),
];

static MARKDOWN_RULES: Lazy<Vec<HighlightRule>> = Lazy::new(|| {
    MARKDOWN_RULE_TABLE
        .iter()
        .map(|(pattern, style)| {
            HighlightRule::new(pattern, *style).expect("valid markdown highlight regex")
        })
        .collect()
});

/// Returns the built-in markdown rules in evaluation order.
pub fn markdown_rules() -> Vec<HighlightRule> {
    MARKDOWN_RULES.clone()
}

#[cfg(test)]
mod tests {
    use super::{markdown_rules, HighlightRule, HighlightStyle, Rgb};

    #[test]
    fn markdown_rules_keep_documented_order() {
        let styles: Vec<_> = markdown_rules().iter().map(|rule| rule.style()).collect();
        assert_eq!(
            styles,
            vec![
                HighlightStyle::Heading1,
                HighlightStyle::Heading2,
                HighlightStyle::Heading3,
                HighlightStyle::Bold,
                HighlightStyle::Italic,
                HighlightStyle::BulletMarker,
                HighlightStyle::InlineCode,
                HighlightStyle::Link,
                HighlightStyle::WikiLink,
                HighlightStyle::BlockQuote,
            ]
        );
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(HighlightRule::new("(", HighlightStyle::Bold).is_err());
    }

    #[test]
    fn heading_sizes_shrink_with_level() {
        let sizes: Vec<_> = [
            HighlightStyle::Heading1,
            HighlightStyle::Heading2,
            HighlightStyle::Heading3,
        ]
        .iter()
        .map(|style| style.attributes().point_size)
        .collect();
        assert_eq!(sizes, vec![Some(16), Some(14), Some(12)]);
    }

    #[test]
    fn links_share_underlined_blue() {
        let link = HighlightStyle::Link.attributes();
        assert_eq!(link, HighlightStyle::WikiLink.attributes());
        assert!(link.underline);
        assert_eq!(link.foreground, Some(Rgb::from_hex(0x3182ce)));
    }
}
