//! TODO/DONE/ARCHIVED marker cycling for text being edited in the outline.

use serde::Serialize;

const TODO: &str = "{{[[TODO]]}}";
const DONE: &str = "{{[[DONE]]}}";
const ARCHIVED: &str = "{{[[ARCHIVED]]}}";
/// `{{[[` precedes the marker word in every prefix.
const WORD_START: usize = 4;

/// Text and caret selection after cycling, in character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerEdit {
    /// New text value.
    pub value: String,
    /// Selection start.
    pub selection_start: usize,
    /// Selection end.
    pub selection_end: usize,
}

/// Keyboard chord that triggers the cycle: Ctrl+Shift+Enter inside a text area.
pub fn is_cycle_chord(key: &str, shift: bool, ctrl: bool, in_text_area: bool) -> bool {
    key == "Enter" && shift && ctrl && in_text_area
}

/// Archives TODO/DONE items, un-archives archived ones, and archives plain text.
///
/// The selection moves with the text so the caret stays on the same character.
///
/// ```
/// use bulletdeck_core::markers::cycle_marker;
///
/// let edit = cycle_marker("{{[[TODO]]}} ship it", 15, 15);
/// assert_eq!(edit.value, "{{[[ARCHIVED]]}} ship it");
/// assert_eq!(edit.selection_start, 19);
/// ```
pub fn cycle_marker(value: &str, selection_start: usize, selection_end: usize) -> MarkerEdit {
    if value.starts_with(TODO) || value.starts_with(DONE) {
        let word_len = TODO.len() - WORD_START * 2;
        let mut next = String::with_capacity(value.len() + 4);
        next.push_str(&value[..WORD_START]);
        next.push_str("ARCHIVED");
        next.push_str(&value[WORD_START + word_len..]);
        let shift = ARCHIVED.len() - TODO.len();
        MarkerEdit {
            value: next,
            selection_start: selection_start + shift,
            selection_end: selection_end + shift,
        }
    } else if let Some(rest) = value.strip_prefix(ARCHIVED) {
        let shift = ARCHIVED.chars().count();
        MarkerEdit {
            value: rest.to_string(),
            selection_start: selection_start.saturating_sub(shift),
            selection_end: selection_end.saturating_sub(shift),
        }
    } else {
        let shift = ARCHIVED.chars().count();
        MarkerEdit {
            value: format!("{ARCHIVED}{value}"),
            selection_start: selection_start + shift,
            selection_end: selection_end + shift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_becomes_archived() {
        let edit = cycle_marker("{{[[DONE]]}} x", 13, 14);
        assert_eq!(edit.value, "{{[[ARCHIVED]]}} x");
        assert_eq!((edit.selection_start, edit.selection_end), (17, 18));
    }

    #[test]
    fn archived_marker_is_removed() {
        let edit = cycle_marker("{{[[ARCHIVED]]}} x", 17, 18);
        assert_eq!(edit.value, " x");
        assert_eq!((edit.selection_start, edit.selection_end), (1, 2));
    }

    #[test]
    fn removal_never_underflows_selection() {
        let edit = cycle_marker("{{[[ARCHIVED]]}}", 3, 5);
        assert_eq!(edit.value, "");
        assert_eq!((edit.selection_start, edit.selection_end), (0, 0));
    }

    #[test]
    fn plain_text_is_archived() {
        let edit = cycle_marker("groceries", 0, 9);
        assert_eq!(edit.value, "{{[[ARCHIVED]]}}groceries");
        assert_eq!((edit.selection_start, edit.selection_end), (16, 25));
    }

    #[test]
    fn chord_requires_all_keys() {
        assert!(is_cycle_chord("Enter", true, true, true));
        assert!(!is_cycle_chord("Enter", true, false, true));
        assert!(!is_cycle_chord("Enter", true, true, false));
        assert!(!is_cycle_chord("a", true, true, true));
    }
}
