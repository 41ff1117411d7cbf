//! Outline-to-deck rendering.
//!
//! `compile_deck` runs the whole pipeline: directive extraction and slide
//! classification (core), bullet markup, markdown-rs HTML, and the
//! collapsible rewrite for slides that asked for it.

mod slide;

pub use slide::{BULLETS_CLASS, BULLETS_CONTENT_CLASS};

use crate::collapsible::CollapsibleTree;
use crate::config::PresentConfig;
use crate::styles::DECK_ROOT_ID;
use bulletdeck_core::{DeckError, Diagnostics, Outline, RefResolver, Slide, derive_slides};
use serde::Serialize;
use slide::render_slide;

/// Title or content, as decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideClass {
    /// Childless slide.
    Title,
    /// Slide with a bullet body.
    Content,
}

/// One rendered slide.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSlide {
    /// Zero-based index.
    pub index: usize,
    /// Classification.
    pub class: SlideClass,
    /// `<section>` HTML.
    pub html: String,
    /// List structure of a collapsible body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<CollapsibleTree>,
}

/// A fully rendered deck.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDeck {
    /// Deck root HTML with every slide.
    pub html: String,
    /// Per-slide results.
    pub slides: Vec<RenderedSlide>,
    /// Fail-open fallbacks taken along the way.
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

impl RenderedDeck {
    /// Warning messages, for hosts that only show text.
    pub fn warning_messages(&self) -> Vec<String> {
        self.diagnostics
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Renders already-derived slides.
pub fn render_deck<R: RefResolver + ?Sized>(
    slides: &[Slide],
    resolver: &R,
) -> Result<RenderedDeck, DeckError> {
    let mut diagnostics = Diagnostics::new();
    let mut rendered = Vec::with_capacity(slides.len());
    let mut html = format!("<div class=\"reveal\" id=\"{DECK_ROOT_ID}\"><div class=\"slides\">");

    for slide in slides {
        for warning in slide.layout_warnings() {
            diagnostics.add_warning(warning);
        }
        let out = render_slide(slide, resolver)?;
        html.push_str(&out.html);
        rendered.push(RenderedSlide {
            index: slide.index,
            class: if slide.is_content() {
                SlideClass::Content
            } else {
                SlideClass::Title
            },
            html: out.html,
            collapsible: out.collapsible,
        });
    }

    html.push_str("</div></div>");
    Ok(RenderedDeck {
        html,
        slides: rendered,
        diagnostics,
    })
}

/// Derives slides from an outline and renders them.
pub fn compile_deck<R: RefResolver + ?Sized>(
    outline: &Outline,
    config: &PresentConfig,
    resolver: &R,
) -> Result<RenderedDeck, DeckError> {
    let (slides, diagnostics) = derive_slides(outline, config.show_notes);
    for warning in &diagnostics.warnings {
        log::warn!("{}", warning);
    }
    let mut deck = render_deck(&slides, resolver)?;
    let mut merged = diagnostics;
    merged.extend(std::mem::take(&mut deck.diagnostics));
    deck.diagnostics = merged;
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletdeck_core::{DeckWarning, IdentityResolver, OutlineNode, ViewType};
    use once_cell::sync::Lazy;

    static OUTLINE: Lazy<Outline> = Lazy::new(|| {
        Outline::new(vec![
            OutlineNode::new("Welcome"),
            OutlineNode::new("Agenda {collapsible}").with_children(vec![
                OutlineNode::new("Intro").with_children(vec![OutlineNode::new("Why")]),
                OutlineNode::new("Demo"),
            ]),
            OutlineNode::new("Chart {layout:image left}").with_children(vec![
                OutlineNode::new("![q3](q3.png)"),
                OutlineNode::new("up and to the right"),
            ]),
            OutlineNode::new("![cover](cover.png)"),
        ])
    });

    fn compile(outline: &Outline, notes: bool) -> RenderedDeck {
        let config = PresentConfig {
            show_notes: notes,
            ..PresentConfig::default()
        };
        compile_deck(outline, &config, &IdentityResolver).unwrap()
    }

    #[test]
    fn deck_has_one_section_per_node() {
        let deck = compile(&OUTLINE, false);
        assert_eq!(deck.slides.len(), 4);
        assert_eq!(deck.html.matches("<section").count(), 4);
        assert!(deck.html.starts_with("<div class=\"reveal\" id=\"bulletdeck-root\"><div class=\"slides\">"));
        assert!(deck.html.ends_with("</section></div></div>"));
    }

    #[test]
    fn title_slide_is_heading() {
        let deck = compile(&OUTLINE, false);
        insta::assert_snapshot!(deck.slides[0].html, @"<section><h1>Welcome</h1></section>");
    }

    #[test]
    fn image_title_is_anchored_at_bottom() {
        let deck = compile(&OUTLINE, false);
        insta::assert_snapshot!(
            deck.slides[3].html,
            @r#"<section style="bottom: 0"><img alt="cover" src="cover.png"></section>"#
        );
    }

    #[test]
    fn content_slide_renders_bullets_without_directives() {
        let deck = compile(&OUTLINE, false);
        let html = &deck.slides[1].html;
        assert_eq!(deck.slides[1].class, SlideClass::Content);
        assert!(html.contains("<h1>Agenda</h1>"));
        assert!(!html.contains("{collapsible}"));
        assert!(html.contains("flex-direction: row\""));
        assert!(html.contains("width: 100%; transform-origin: left top"));
    }

    #[test]
    fn collapsible_slide_starts_collapsed() {
        let deck = compile(&OUTLINE, false);
        let slide = &deck.slides[1];
        let tree = slide.collapsible.as_ref().unwrap();
        assert_eq!(tree.len(), 3);
        assert!(slide.html.contains("deck-caret--right"));
        assert_eq!(slide.html.matches("display: none").count(), 1);
        assert!(deck.slides[2].collapsible.is_none());
    }

    #[test]
    fn image_layout_splits_columns() {
        let deck = compile(&OUTLINE, false);
        let html = &deck.slides[2].html;
        assert!(html.contains("flex-direction: row-reverse"));
        assert!(html.contains("width: 50%; transform-origin: left top"));
        assert!(html.contains("<img alt=\"q3\" src=\"q3.png\">"));
        assert!(html.contains("<li>up and to the right</li>"));
        assert!(!html.contains("<li><img"));
    }

    #[test]
    fn notes_mode_moves_last_child_to_aside() {
        let outline = Outline::new(vec![OutlineNode::new("Topic").with_children(vec![
            OutlineNode::new("visible point"),
            OutlineNode::new("speaker only"),
        ])]);
        let html = &compile(&outline, true).slides[0].html;
        assert!(html.contains("<aside class=\"notes\"><ul>\n<li>speaker only</li>\n</ul>"));
        assert_eq!(html.matches("speaker only").count(), 1);
        assert!(html.contains("<li>visible point</li>"));
    }

    #[test]
    fn numbered_slide_renders_ordered_list() {
        let outline = Outline::new(vec![OutlineNode::new("Steps")
            .with_view_type(ViewType::Numbered)
            .with_children(vec![OutlineNode::new("one"), OutlineNode::new("two")])]);
        let html = &compile(&outline, false).slides[0].html;
        assert!(html.contains("<ol>"));
    }

    #[test]
    fn heading_text_is_escaped() {
        let outline = Outline::new(vec![OutlineNode::new("a < b & c")]);
        let html = &compile(&outline, false).slides[0].html;
        assert!(html.contains("<h1>a &lt; b &amp; c</h1>"));
    }

    #[test]
    fn fallbacks_are_reported() {
        let outline = Outline::new(vec![
            OutlineNode::new("X {layout:image right}").with_children(vec![OutlineNode::new("text")]),
            OutlineNode::new("Y {layout:}"),
        ]);
        let deck = compile(&outline, false);
        assert!(deck.slides[0].html.contains("<div></div>"));
        assert!(deck.diagnostics.warnings.iter().any(|w| matches!(w, DeckWarning::EmptyLayout { slide: 1 })));
    }
}
