//! Edit intents consumed by the structural editor.

use crate::buffer::line_model::Position;

/// Selection range expressed as anchor (where it started) and head (where
/// the caret is).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub const fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Earlier of the two ends.
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// Later of the two ends.
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }
}

/// Editing gesture recognised by the structural editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Tab,
    ShiftTab,
    Enter,
    ToggleBold,
    ToggleItalic,
    ToggleCode,
    /// Rewrites the current line as a heading with this many `#`.
    SetHeading(u32),
    ToggleBullet,
}

impl EditAction {
    /// Stable name used in log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::ShiftTab => "shift_tab",
            Self::Enter => "enter",
            Self::ToggleBold => "toggle_bold",
            Self::ToggleItalic => "toggle_italic",
            Self::ToggleCode => "toggle_code",
            Self::SetHeading(_) => "set_heading",
            Self::ToggleBullet => "toggle_bullet",
        }
    }
}

/// One editing action plus the caret/selection it applies to.
///
/// Positions may be stale relative to the buffer; the editor clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditIntent {
    pub action: EditAction,
    pub cursor: Position,
    pub selection: Option<Selection>,
}

impl EditIntent {
    /// Intent with a bare caret and no selection.
    pub fn new(action: EditAction, cursor: Position) -> Self {
        Self {
            action,
            cursor,
            selection: None,
        }
    }

    /// Intent over a selection; the caret sits at the selection head.
    pub fn with_selection(action: EditAction, anchor: Position, head: Position) -> Self {
        Self {
            action,
            cursor: head,
            selection: Some(Selection::new(anchor, head)),
        }
    }
}

/// Result of applying one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Caret position after the edit.
    pub cursor: Position,
    /// Whether the buffer text changed.
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use super::{EditAction, EditIntent, Selection};
    use crate::buffer::line_model::Position;

    #[test]
    fn selection_orders_ends() {
        let selection = Selection::new(Position::new(3, 1), Position::new(1, 4));
        assert_eq!(selection.start(), Position::new(1, 4));
        assert_eq!(selection.end(), Position::new(3, 1));
        assert!(!selection.is_empty());
    }

    #[test]
    fn with_selection_places_cursor_at_head() {
        let intent = EditIntent::with_selection(
            EditAction::ToggleBold,
            Position::new(0, 0),
            Position::new(0, 5),
        );
        assert_eq!(intent.cursor, Position::new(0, 5));
        assert_eq!(EditAction::SetHeading(3).as_str(), "set_heading");
    }
}
