//! Outline-style editing rules for markdown buffers.
//!
//! # Responsibility
//! - Translate one `EditIntent` into buffer mutations and a new caret.
//! - Keep list continuation, indentation and inline-format toggles
//!   deterministic and independent of any UI toolkit.
//!
//! # Invariants
//! - Each intent is applied inside one buffer batch, so it publishes at most
//!   one `BufferEvent::Edited`.
//! - Out-of-range carets and selections are clamped, never rejected.
//! - Bullet toggling is idempotent; inline-format toggles are not (markers
//!   nest when reapplied).

use crate::buffer::line_model::{BufferError, LineModel, Position};
use crate::editor::intent::{EditAction, EditIntent, EditOutcome, Selection};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static BULLET_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+])\s+(.*)$").expect("valid bullet line regex"));
static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*+]\s+").expect("valid bullet prefix regex"));
static HEADING_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s+").expect("valid heading prefix regex"));

const BOLD_MARKER: &str = "**";
const ITALIC_MARKER: &str = "*";
const CODE_MARKER: &str = "`";
/// Hard ceiling on `#` markers, applied even when no heading cap is configured.
const HEADING_MARKER_LIMIT: u32 = 256;

/// Tunables for structural editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Spaces inserted by Tab and removed (at most) by Shift-Tab.
    pub indent_width: usize,
    /// Optional upper bound for `SetHeading`. `None` keeps levels unbounded.
    pub max_heading_level: Option<u32>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            indent_width: 4,
            max_heading_level: None,
        }
    }
}

/// Error raised while applying an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    Buffer(BufferError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffer(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
        }
    }
}

impl From<BufferError> for EditError {
    fn from(value: BufferError) -> Self {
        Self::Buffer(value)
    }
}

/// Applies edit intents to a [`LineModel`].
#[derive(Debug, Clone, Default)]
pub struct StructuralEditor {
    settings: EditorSettings,
}

impl StructuralEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Applies `intent` to `buffer` as one logical edit.
    ///
    /// # Errors
    /// - Returns [`EditError::Buffer`] if a line primitive is addressed out of
    ///   range. Positions are clamped first, so this indicates a bug rather
    ///   than bad input.
    pub fn apply(
        &self,
        buffer: &mut LineModel,
        intent: &EditIntent,
    ) -> Result<EditOutcome, EditError> {
        let cursor = buffer.clamp(intent.cursor);
        let selection = intent
            .selection
            .map(|selection| {
                Selection::new(buffer.clamp(selection.anchor), buffer.clamp(selection.head))
            })
            .filter(|selection| !selection.is_empty());
        let revision_before = buffer.revision();

        let cursor = buffer.batch(|buffer| -> Result<Position, EditError> {
            match intent.action {
                EditAction::Tab => self.indent(buffer, cursor, selection),
                EditAction::ShiftTab => self.outdent(buffer, cursor, selection),
                EditAction::Enter => enter(buffer, cursor, selection),
                EditAction::ToggleBullet => toggle_bullet(buffer, cursor, selection),
                EditAction::SetHeading(level) => self.set_heading(buffer, cursor, level),
                EditAction::ToggleBold => Ok(wrap(buffer, cursor, selection, BOLD_MARKER)),
                EditAction::ToggleItalic => Ok(wrap(buffer, cursor, selection, ITALIC_MARKER)),
                EditAction::ToggleCode => Ok(wrap(buffer, cursor, selection, CODE_MARKER)),
            }
        })?;

        let changed = buffer.revision() != revision_before;
        debug!(
            "event=edit_apply module=editor status=ok action={} changed={}",
            intent.action.as_str(),
            changed
        );
        Ok(EditOutcome { cursor, changed })
    }

    fn indent(
        &self,
        buffer: &mut LineModel,
        cursor: Position,
        selection: Option<Selection>,
    ) -> Result<Position, EditError> {
        let pad = " ".repeat(self.settings.indent_width);
        let Some(selection) = selection else {
            return Ok(buffer.insert_text(cursor, &pad));
        };

        for index in selection.start().line..=selection.end().line {
            let line = buffer.line(index).unwrap_or_default();
            let indented = format!("{pad}{line}");
            buffer.replace_line(index, indented)?;
        }
        Ok(Position::new(
            cursor.line,
            cursor.column + self.settings.indent_width,
        ))
    }

    fn outdent(
        &self,
        buffer: &mut LineModel,
        cursor: Position,
        selection: Option<Selection>,
    ) -> Result<Position, EditError> {
        let (first, last) = target_lines(cursor, selection);
        let mut cursor = cursor;

        for index in first..=last {
            let line = buffer.line(index).unwrap_or_default();
            let removable = line
                .chars()
                .take(self.settings.indent_width)
                .take_while(|ch| *ch == ' ')
                .count();
            if removable == 0 {
                continue;
            }
            let outdented = line[removable..].to_string();
            buffer.replace_line(index, outdented)?;
            if index == cursor.line {
                cursor.column -= cursor.column.min(removable);
            }
        }
        Ok(cursor)
    }

    fn set_heading(
        &self,
        buffer: &mut LineModel,
        cursor: Position,
        level: u32,
    ) -> Result<Position, EditError> {
        let mut level = level.max(1);
        if let Some(cap) = self.settings.max_heading_level {
            level = level.min(cap.max(1));
        }
        if level > HEADING_MARKER_LIMIT {
            warn!(
                "event=edit_apply module=editor status=clamped action=set_heading level={level} limit={HEADING_MARKER_LIMIT}"
            );
            level = HEADING_MARKER_LIMIT;
        }

        let line = buffer.line(cursor.line).unwrap_or_default().trim();
        let body = HEADING_PREFIX_RE
            .find(line)
            .map_or(line, |prefix| &line[prefix.end()..]);
        let hashes = "#".repeat(level as usize);
        let heading = format!("{hashes} {body}");

        buffer.replace_line(cursor.line, heading)?;
        Ok(buffer.line_end(cursor.line))
    }
}

fn enter(
    buffer: &mut LineModel,
    cursor: Position,
    selection: Option<Selection>,
) -> Result<Position, EditError> {
    let cursor = match selection {
        Some(selection) => {
            buffer.remove_range(selection.start(), selection.end());
            selection.start()
        }
        None => cursor,
    };
    let line = buffer.line(cursor.line).unwrap_or_default().to_string();

    if let Some(caps) = BULLET_LINE_RE.captures(&line) {
        let indent = caps.get(1).map_or("", |m| m.as_str());
        let marker = caps.get(2).map_or("-", |m| m.as_str());
        let body = caps.get(3).map_or("", |m| m.as_str());

        if body.trim().is_empty() {
            buffer.delete_line(cursor.line)?;
            return Ok(match cursor.line.checked_sub(1) {
                Some(previous) => buffer.line_end(previous),
                None => Position::new(0, 0),
            });
        }

        let continuation = format!("\n{indent}{marker} ");
        return Ok(buffer.insert_text(cursor, &continuation));
    }

    let indentation = leading_spaces(&line);
    let break_text = format!("\n{}", " ".repeat(indentation));
    Ok(buffer.insert_text(cursor, &break_text))
}

fn toggle_bullet(
    buffer: &mut LineModel,
    cursor: Position,
    selection: Option<Selection>,
) -> Result<Position, EditError> {
    let (first, last) = target_lines(cursor, selection);
    let mut cursor = cursor;

    for index in first..=last {
        let line = buffer.line(index).unwrap_or_default();
        if BULLET_PREFIX_RE.is_match(line) {
            continue;
        }
        let indent_bytes = line.len() - line.trim_start().len();
        let indent_chars = line[..indent_bytes].chars().count();
        let bulleted = format!("{}- {}", &line[..indent_bytes], &line[indent_bytes..]);
        buffer.replace_line(index, bulleted)?;
        if index == cursor.line && cursor.column >= indent_chars {
            cursor.column += 2;
        }
    }
    Ok(cursor)
}

fn wrap(
    buffer: &mut LineModel,
    cursor: Position,
    selection: Option<Selection>,
    marker: &str,
) -> Position {
    match selection {
        Some(selection) => {
            let selected = buffer.remove_range(selection.start(), selection.end());
            let wrapped = format!("{marker}{selected}{marker}");
            buffer.insert_text(selection.start(), &wrapped)
        }
        None => {
            buffer.insert_text(cursor, &format!("{marker}{marker}"));
            Position::new(cursor.line, cursor.column + marker.chars().count())
        }
    }
}

fn target_lines(cursor: Position, selection: Option<Selection>) -> (usize, usize) {
    match selection {
        Some(selection) => (selection.start().line, selection.end().line),
        None => (cursor.line, cursor.line),
    }
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|ch| *ch == ' ').count()
}
