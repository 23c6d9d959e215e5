//! Line-oriented text buffer.
//!
//! # Responsibility
//! - Own the editable markdown text as an ordered sequence of lines.
//! - Provide line-level and range-level primitives for editing rules.
//! - Publish change notifications to subscribers.
//!
//! # Invariants
//! - `\n` is the only line separator; every other character (including `\r`)
//!   is kept verbatim inside its line.
//! - The buffer always holds at least one (possibly empty) line.
//! - Columns are counted in Unicode scalar values, not bytes.
//! - A batch emits at most one `BufferEvent::Edited`, however many
//!   primitives ran inside it.
//! - `set_content` emits `BufferEvent::Replaced`, never `Edited`.

use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};

pub type BufferResult<T> = Result<T, BufferError>;

/// Line/column location inside a [`LineModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in characters.
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Change notification published by [`LineModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    /// Text changed through an edit (a primitive or a batched intent).
    Edited,
    /// Whole content replaced programmatically via `set_content`.
    Replaced,
}

/// Error for line-level primitives addressed outside the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    LineOutOfRange { index: usize, line_count: usize },
}

impl Display for BufferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineOutOfRange { index, line_count } => write!(
                f,
                "line index {index} is out of range for buffer with {line_count} lines"
            ),
        }
    }
}

impl Error for BufferError {}

/// Mutable markdown buffer stored as lines.
#[derive(Debug)]
pub struct LineModel {
    lines: Vec<String>,
    revision: u64,
    batch_depth: usize,
    batch_dirty: bool,
    subscribers: Vec<Sender<BufferEvent>>,
}

impl Default for LineModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LineModel {
    /// Creates an empty buffer (one empty line).
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            revision: 0,
            batch_depth: 0,
            batch_dirty: false,
            subscribers: Vec::new(),
        }
    }

    /// Creates a buffer holding `text`, without publishing any event.
    pub fn from_text(text: &str) -> Self {
        let mut model = Self::new();
        model.lines = split_lines(text);
        model
    }

    /// Registers a subscriber and returns its receiving end.
    ///
    /// Subscribers whose receiver was dropped are pruned on the next event.
    pub fn subscribe(&mut self) -> Receiver<BufferEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Monotonic counter bumped by every mutation, including `set_content`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns line `index`, or `None` when out of range.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of characters on line `index` (0 when out of range).
    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).map_or(0, |line| line.chars().count())
    }

    /// Returns the whole buffer joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether the buffer holds exactly one empty line.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Replaces the whole buffer programmatically.
    ///
    /// Publishes `BufferEvent::Replaced` so downstream autosave logic can
    /// tell this apart from user edits.
    pub fn set_content(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.revision += 1;
        debug!(
            "event=buffer_replace module=editor status=ok lines={}",
            self.lines.len()
        );
        self.publish(BufferEvent::Replaced);
    }

    /// Replaces line `index` with `text`.
    ///
    /// `text` is stored as a single line; callers must not pass `\n`.
    pub fn replace_line(&mut self, index: usize, text: impl Into<String>) -> BufferResult<()> {
        self.check_line(index)?;
        self.lines[index] = text.into();
        self.mark_edited();
        Ok(())
    }

    /// Inserts `text` as a new line before `index` (`index == line_count`
    /// appends).
    pub fn insert_line(&mut self, index: usize, text: impl Into<String>) -> BufferResult<()> {
        if index > self.lines.len() {
            return Err(self.out_of_range(index));
        }
        self.lines.insert(index, text.into());
        self.mark_edited();
        Ok(())
    }

    /// Removes line `index` and returns its text.
    ///
    /// Deleting the only line leaves a single empty line behind.
    pub fn delete_line(&mut self, index: usize) -> BufferResult<String> {
        self.check_line(index)?;
        let removed = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(index)
        };
        self.mark_edited();
        Ok(removed)
    }

    /// Clamps `position` to the nearest valid location in the buffer.
    pub fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.lines.len() - 1);
        let column = position.column.min(self.line_len(line));
        Position { line, column }
    }

    /// End-of-line position for line `index` (clamped).
    pub fn line_end(&self, index: usize) -> Position {
        let line = index.min(self.lines.len() - 1);
        Position::new(line, self.line_len(line))
    }

    /// Inserts `text` at `at` and returns the position right after it.
    ///
    /// `text` may contain `\n`, which splits lines. `at` is clamped.
    pub fn insert_text(&mut self, at: Position, text: &str) -> Position {
        let at = self.clamp(at);
        if text.is_empty() {
            return at;
        }

        let current = &self.lines[at.line];
        let split = byte_index(current, at.column);
        let tail = current[split..].to_string();
        let head = current[..split].to_string();

        let mut pieces = text.split('\n');
        let first = pieces.next().unwrap_or_default();
        let rest: Vec<&str> = pieces.collect();

        let end = if rest.is_empty() {
            self.lines[at.line] = format!("{head}{first}{tail}");
            Position::new(at.line, at.column + first.chars().count())
        } else {
            self.lines[at.line] = format!("{head}{first}");
            let last_index = rest.len() - 1;
            for (offset, piece) in rest.iter().enumerate() {
                let line_index = at.line + 1 + offset;
                let value = if offset == last_index {
                    format!("{piece}{tail}")
                } else {
                    (*piece).to_string()
                };
                self.lines.insert(line_index, value);
            }
            Position::new(at.line + rest.len(), rest[last_index].chars().count())
        };

        self.mark_edited();
        end
    }

    /// Returns the text between two positions (order-insensitive, clamped).
    pub fn text_in_range(&self, from: Position, to: Position) -> String {
        let (start, end) = self.ordered(from, to);
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_index(line, start.column)..byte_index(line, end.column)].to_string();
        }

        let mut parts = Vec::with_capacity(end.line - start.line + 1);
        let first = &self.lines[start.line];
        parts.push(&first[byte_index(first, start.column)..]);
        for line in &self.lines[start.line + 1..end.line] {
            parts.push(line.as_str());
        }
        let last = &self.lines[end.line];
        parts.push(&last[..byte_index(last, end.column)]);
        parts.join("\n")
    }

    /// Removes the text between two positions and returns it.
    ///
    /// Positions are clamped and may be given in either order. The start of
    /// the removed range is where the caret should land afterwards.
    pub fn remove_range(&mut self, from: Position, to: Position) -> String {
        let (start, end) = self.ordered(from, to);
        if start == end {
            return String::new();
        }
        let removed = self.text_in_range(start, end);

        let head = {
            let line = &self.lines[start.line];
            line[..byte_index(line, start.column)].to_string()
        };
        let tail = {
            let line = &self.lines[end.line];
            line[byte_index(line, end.column)..].to_string()
        };
        self.lines.drain(start.line + 1..=end.line);
        self.lines[start.line] = format!("{head}{tail}");

        self.mark_edited();
        removed
    }

    /// Runs `apply` as one logical edit.
    ///
    /// Primitives executed inside the closure publish nothing individually;
    /// a single `BufferEvent::Edited` follows when any of them changed the
    /// text. Nested batches fold into the outermost one.
    pub fn batch<T>(&mut self, apply: impl FnOnce(&mut Self) -> T) -> T {
        self.batch_depth += 1;
        let result = apply(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.batch_dirty {
            self.batch_dirty = false;
            self.publish(BufferEvent::Edited);
        }
        result
    }

    fn ordered(&self, from: Position, to: Position) -> (Position, Position) {
        let from = self.clamp(from);
        let to = self.clamp(to);
        if from <= to {
            (from, to)
        } else {
            (to, from)
        }
    }

    fn mark_edited(&mut self) {
        self.revision += 1;
        if self.batch_depth > 0 {
            self.batch_dirty = true;
        } else {
            self.publish(BufferEvent::Edited);
        }
    }

    fn publish(&mut self, event: BufferEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn check_line(&self, index: usize) -> BufferResult<()> {
        if index >= self.lines.len() {
            return Err(self.out_of_range(index));
        }
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> BufferError {
        BufferError::LineOutOfRange {
            index,
            line_count: self.lines.len(),
        }
    }
}

/// Byte offset of character `column` in `line`, saturating at the end.
pub(crate) fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(index, _)| index)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::{BufferError, BufferEvent, LineModel, Position};

    #[test]
    fn new_buffer_has_one_empty_line() {
        let model = LineModel::new();
        assert_eq!(model.line_count(), 1);
        assert!(model.is_empty());
        assert_eq!(model.text(), "");
    }

    #[test]
    fn text_round_trips_without_normalizing_carriage_returns() {
        let model = LineModel::from_text("a\r\nb\n\nc");
        assert_eq!(model.line_count(), 4);
        assert_eq!(model.line(0), Some("a\r"));
        assert_eq!(model.text(), "a\r\nb\n\nc");
    }

    #[test]
    fn line_primitives_keep_order() {
        let mut model = LineModel::from_text("one\nthree");
        model.insert_line(1, "two").unwrap();
        model.insert_line(3, "four").unwrap();
        assert_eq!(model.text(), "one\ntwo\nthree\nfour");

        model.replace_line(0, "zero").unwrap();
        assert_eq!(model.delete_line(3).unwrap(), "four");
        assert_eq!(model.text(), "zero\ntwo\nthree");
    }

    #[test]
    fn out_of_range_primitives_return_errors() {
        let mut model = LineModel::from_text("only");
        assert_eq!(
            model.replace_line(1, "x"),
            Err(BufferError::LineOutOfRange {
                index: 1,
                line_count: 1
            })
        );
        assert!(model.insert_line(2, "x").is_err());
        assert!(model.delete_line(5).is_err());
        assert_eq!(model.text(), "only");
    }

    #[test]
    fn deleting_last_line_keeps_one_empty_line() {
        let mut model = LineModel::from_text("solo");
        assert_eq!(model.delete_line(0).unwrap(), "solo");
        assert_eq!(model.line_count(), 1);
        assert!(model.is_empty());
    }

    #[test]
    fn insert_text_splits_lines_and_returns_end() {
        let mut model = LineModel::from_text("hello world");
        let end = model.insert_text(Position::new(0, 5), ",\nbig");
        assert_eq!(model.text(), "hello,\nbig world");
        assert_eq!(end, Position::new(1, 3));
    }

    #[test]
    fn insert_text_counts_columns_in_chars() {
        let mut model = LineModel::from_text("héllo");
        let end = model.insert_text(Position::new(0, 2), "X");
        assert_eq!(model.text(), "héXllo");
        assert_eq!(end, Position::new(0, 3));
    }

    #[test]
    fn remove_range_spans_lines_in_either_order() {
        let mut model = LineModel::from_text("abc\ndef\nghi");
        let removed = model.remove_range(Position::new(2, 1), Position::new(0, 1));
        assert_eq!(removed, "bc\ndef\ng");
        assert_eq!(model.text(), "ahi");
    }

    #[test]
    fn clamp_limits_line_and_column() {
        let model = LineModel::from_text("ab\nc");
        assert_eq!(model.clamp(Position::new(9, 9)), Position::new(1, 1));
        assert_eq!(model.clamp(Position::new(0, 7)), Position::new(0, 2));
    }

    #[test]
    fn each_unbatched_primitive_publishes_edited() {
        let mut model = LineModel::from_text("a");
        let rx = model.subscribe();
        model.insert_line(1, "b").unwrap();
        model.replace_line(0, "c").unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![BufferEvent::Edited; 2]);
    }

    #[test]
    fn batch_publishes_single_edited_event() {
        let mut model = LineModel::from_text("a\nb\nc");
        let rx = model.subscribe();
        model.batch(|m| {
            for index in 0..3 {
                let line = format!("    {}", m.line(index).unwrap_or_default());
                m.replace_line(index, line).unwrap();
            }
        });
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![BufferEvent::Edited]);
    }

    #[test]
    fn batch_without_changes_publishes_nothing() {
        let mut model = LineModel::from_text("a");
        let rx = model.subscribe();
        model.batch(|m| m.line_count());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn set_content_publishes_replaced_not_edited() {
        let mut model = LineModel::new();
        let rx = model.subscribe();
        model.set_content("# Title\n\nbody");
        assert_eq!(model.line_count(), 3);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![BufferEvent::Replaced]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut model = LineModel::new();
        let rx = model.subscribe();
        drop(rx);
        model.insert_line(0, "x").unwrap();
        assert!(model.subscribers.is_empty());
    }
}
