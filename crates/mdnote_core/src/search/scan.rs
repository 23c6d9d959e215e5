//! Linear substring search over notes.
//!
//! # Responsibility
//! - Match notes by case-insensitive substring on title or content.
//!
//! # Invariants
//! - An empty query matches every note.
//! - Result order follows the input iteration order.
//! - Cost is O(notes x content length); there is no index.

use crate::model::note::Note;

/// Whether `note` matches an already-lowercased query.
pub fn note_matches(note: &Note, query_lower: &str) -> bool {
    note.title().to_lowercase().contains(query_lower)
        || note.content().to_lowercase().contains(query_lower)
}

/// Returns the notes whose title or content contains `query`, ignoring case.
pub fn search_notes<'a, I>(notes: I, query: &str) -> Vec<&'a Note>
where
    I: IntoIterator<Item = &'a Note>,
{
    if query.is_empty() {
        return notes.into_iter().collect();
    }
    let query_lower = query.to_lowercase();
    notes
        .into_iter()
        .filter(|note| note_matches(note, &query_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::search_notes;
    use crate::model::note::Note;

    fn sample() -> Vec<Note> {
        vec![
            Note::with_id("1", "Shopping", "eggs and MILK"),
            Note::with_id("2", "Milkshake recipes", "blend"),
            Note::with_id("3", "Travel", "passport"),
        ]
    }

    #[test]
    fn matches_title_or_content_ignoring_case() {
        let notes = sample();
        let ids: Vec<_> = search_notes(&notes, "milk")
            .iter()
            .map(|note| note.id())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let notes = sample();
        assert_eq!(search_notes(&notes, "").len(), 3);
    }

    #[test]
    fn no_match_returns_empty() {
        let notes = sample();
        assert!(search_notes(&notes, "zebra").is_empty());
    }
}
