//! Slide heading directives.
//!
//! A slide heading may carry two inline directives:
//!
//! - `{layout:<value>}` picks the slide layout (`image`, `image left`, ...).
//! - `{collapsible}` turns nested bullets into collapsible lists.
//!
//! Both are matched case-insensitively, each against the original heading,
//! so they may appear anywhere and in any order. Anything that does not
//! match is left in the text untouched.

use serde::{Deserialize, Serialize};

const LAYOUT_OPEN: &str = "{layout:";
const COLLAPSIBLE: &str = "{collapsible}";

/// Layout name captured from a `{layout:...}` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout(String);

impl Layout {
    /// Name used when no directive is present.
    pub const DEFAULT: &'static str = "default";

    /// Wraps a captured layout value verbatim.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The captured value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Layout starts with `image ` (any case): the first child drives an image column.
    pub fn is_image(&self) -> bool {
        starts_with_ignore_case(&self.0, "image ")
    }

    /// Layout ends with ` left` (any case): the columns are swapped.
    pub fn is_left(&self) -> bool {
        ends_with_ignore_case(&self.0, " left")
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something odd noticed while reading directives. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveIssue {
    /// `{layout:` without a closing brace.
    Unclosed {
        /// Text following the opening marker.
        context: String,
    },
    /// `{layout:}` with a blank value.
    EmptyLayout,
}

/// Heading text with its directives pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDirectives {
    /// Trimmed heading text with recognized directives removed.
    pub text: String,
    /// Captured layout, or `default`.
    pub layout: Layout,
    /// Whether `{collapsible}` was present.
    pub collapsible: bool,
    /// Fail-open notes for diagnostics.
    pub issues: Vec<DirectiveIssue>,
}

/// Extracts `{layout:...}` and `{collapsible}` from a slide heading.
///
/// ```
/// use bulletdeck_core::directives::extract_directives;
///
/// let parsed = extract_directives("Results {layout:image left} {Collapsible}");
/// assert_eq!(parsed.text, "Results");
/// assert_eq!(parsed.layout.as_str(), "image left");
/// assert!(parsed.collapsible);
/// ```
pub fn extract_directives(input: &str) -> SlideDirectives {
    // ASCII lowercasing keeps byte offsets valid for slicing `input`.
    let folded = input.to_ascii_lowercase();
    let mut issues = Vec::new();
    let mut removals: Vec<std::ops::Range<usize>> = Vec::with_capacity(2);
    let mut layout = Layout::default();

    if let Some(open) = folded.find(LAYOUT_OPEN) {
        let value_start = open + LAYOUT_OPEN.len();
        match input[value_start..].find('}') {
            Some(close) => {
                let value = &input[value_start..value_start + close];
                if value.trim().is_empty() {
                    issues.push(DirectiveIssue::EmptyLayout);
                } else {
                    layout = Layout::new(value);
                }
                removals.push(open..value_start + close + 1);
            }
            None => issues.push(DirectiveIssue::Unclosed {
                context: input[open..].to_string(),
            }),
        }
    }

    let collapsible = match find_outside(&folded, COLLAPSIBLE, removals.first()) {
        Some(start) => {
            removals.push(start..start + COLLAPSIBLE.len());
            true
        }
        None => false,
    };

    removals.sort_by_key(|range| std::cmp::Reverse(range.start));
    let mut text = input.to_string();
    for range in removals {
        text.replace_range(range, "");
    }

    SlideDirectives {
        text: text.trim().to_string(),
        layout,
        collapsible,
        issues,
    }
}

/// First occurrence of `needle` that does not overlap `skip`.
fn find_outside(haystack: &str, needle: &str, skip: Option<&std::ops::Range<usize>>) -> Option<usize> {
    let mut from = 0usize;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        match skip {
            Some(range) if start < range.end && end > range.start => from = start + 1,
            _ => return Some(start),
        }
    }
    None
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value
            .get(value.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_heading_keeps_defaults() {
        let parsed = extract_directives("  Quarterly review  ");
        assert_eq!(parsed.text, "Quarterly review");
        assert_eq!(parsed.layout.as_str(), "default");
        assert!(!parsed.collapsible);
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn directive_order_does_not_matter() {
        let a = extract_directives("Deck {collapsible}{layout:image left}");
        let b = extract_directives("Deck {layout:image left}{collapsible}");
        assert_eq!(a.layout.as_str(), "image left");
        assert_eq!(b.layout.as_str(), "image left");
        assert!(a.collapsible && b.collapsible);
        assert_eq!(a.text, b.text);
        assert_eq!(a.text, "Deck");
    }

    #[test]
    fn layout_value_is_verbatim() {
        let parsed = extract_directives("{LAYOUT:Image  Left}Title");
        assert_eq!(parsed.layout.as_str(), "Image  Left");
        assert_eq!(parsed.text, "Title");
        assert!(parsed.layout.is_image());
        assert!(parsed.layout.is_left());
    }

    #[test]
    fn directives_in_the_middle_are_removed() {
        let parsed = extract_directives("Before {collapsible} after");
        assert_eq!(parsed.text, "Before  after");
        assert!(parsed.collapsible);
    }

    #[test]
    fn only_first_collapsible_is_removed() {
        let parsed = extract_directives("{collapsible} x {collapsible}");
        assert_eq!(parsed.text, "x {collapsible}");
    }

    #[test]
    fn unclosed_layout_is_left_in_text() {
        let parsed = extract_directives("Broken {layout:image");
        assert_eq!(parsed.text, "Broken {layout:image");
        assert_eq!(parsed.layout.as_str(), "default");
        assert!(matches!(parsed.issues[0], DirectiveIssue::Unclosed { .. }));
    }

    #[test]
    fn blank_layout_falls_back_to_default() {
        let parsed = extract_directives("Slide {layout:   }");
        assert_eq!(parsed.text, "Slide");
        assert_eq!(parsed.layout, Layout::default());
        assert_eq!(parsed.issues, vec![DirectiveIssue::EmptyLayout]);
    }

    #[test]
    fn unknown_directives_stay() {
        let parsed = extract_directives("Slide {theme:dark}");
        assert_eq!(parsed.text, "Slide {theme:dark}");
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = extract_directives("A {layout:image} {collapsible} B");
        let second = extract_directives(&first.text);
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn layout_predicates() {
        assert!(Layout::new("image right").is_image());
        assert!(!Layout::new("images").is_image());
        assert!(!Layout::new("image").is_image());
        assert!(Layout::new("text LEFT").is_left());
        assert!(!Layout::new("left").is_left());
        assert!(!Layout::default().is_image());
    }
}
