//! markdown-rs adapter for bullet markup.

use bulletdeck_core::{DeckError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parse options shared by HTML conversion and the list-structure pass.
///
/// GFM without footnotes: footnote definitions are emitted at the end of the
/// document, which would break the one-to-one order between list items in
/// the tree and `<li>` elements in the HTML.
pub fn parse_options() -> markdown::ParseOptions {
    markdown::ParseOptions {
        constructs: markdown::Constructs {
            gfm_footnote_definition: false,
            gfm_label_start_footnote: false,
            ..markdown::Constructs::gfm()
        },
        ..markdown::ParseOptions::gfm()
    }
}

fn options() -> markdown::Options {
    markdown::Options {
        parse: parse_options(),
        compile: markdown::CompileOptions {
            gfm_tagfilter: true,
            ..markdown::CompileOptions::default()
        },
    }
}

/// Converts bullet markup to HTML.
pub fn to_html(markup: &str) -> Result<String, DeckError> {
    markdown::to_html_with_options(markup, &options()).map_err(|err| adapter_error(&err))
}

/// Parses bullet markup into MDAST with the same options as [`to_html`].
pub fn to_mdast(markup: &str) -> Result<Node, DeckError> {
    markdown::to_mdast(markup, &parse_options()).map_err(|err| adapter_error(&err))
}

fn adapter_error(message: &Message) -> DeckError {
    DeckError::Markdown {
        message: message.to_string(),
        location: message_location(message),
    }
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_bullets_become_nested_lists() {
        let html = to_html("- a\n    - b").unwrap();
        assert_eq!(html.matches("<ul>").count(), 2);
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn numbered_marker_becomes_ordered_list() {
        let html = to_html("1. a\n1. b").unwrap();
        assert!(html.contains("<ol>"));
    }

    #[test]
    fn heading_inside_item_is_rendered() {
        let html = to_html("- ## Big").unwrap();
        assert!(html.contains("<h2>Big</h2>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = to_html("- <script>alert(1)</script>").unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn footnote_syntax_stays_literal() {
        let html = to_html("- see [^1]\n\n[^1]: note").unwrap();
        assert!(!html.contains("data-footnotes"));
    }

    #[test]
    fn mdast_root_parses() {
        assert!(matches!(to_mdast("- a").unwrap(), Node::Root(_)));
    }
}
