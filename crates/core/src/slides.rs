//! Slide records derived from top-level outline nodes, and their classification.

use crate::directives::{DirectiveIssue, Layout, extract_directives};
use crate::error::{DeckWarning, Diagnostics};
use crate::image::{ImageRef, find_image, is_broken_image};
use crate::outline::{Outline, OutlineNode, ViewType};

/// One slide, built from a top-level outline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Zero-based position in the deck.
    pub index: usize,
    /// Heading text with directives removed.
    pub text: String,
    /// Body bullets (the note child is excluded in notes mode).
    pub children: Vec<OutlineNode>,
    /// Speaker note promoted from the last child in notes mode.
    pub note: Option<OutlineNode>,
    /// Layout from `{layout:...}`.
    pub layout: Layout,
    /// Whether `{collapsible}` was set.
    pub collapsible: bool,
    /// View type of the source node; drives the markers of the body bullets.
    pub view_type: ViewType,
}

/// Builds slide records for every top-level node.
///
/// With `show_notes`, the last child of each node becomes the speaker note.
/// A node without children has no note.
pub fn derive_slides(outline: &Outline, show_notes: bool) -> (Vec<Slide>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let slides = outline
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| derive_slide(index, node, show_notes, &mut diagnostics))
        .collect();
    (slides, diagnostics)
}

fn derive_slide(
    index: usize,
    node: &OutlineNode,
    show_notes: bool,
    diagnostics: &mut Diagnostics,
) -> Slide {
    let parsed = extract_directives(&node.text);
    for issue in parsed.issues {
        diagnostics.add_warning(match issue {
            DirectiveIssue::Unclosed { context } => DeckWarning::UnclosedDirective {
                slide: index,
                context,
            },
            DirectiveIssue::EmptyLayout => DeckWarning::EmptyLayout { slide: index },
        });
    }

    let (children, note) = match node.children.split_last() {
        Some((last, rest)) if show_notes => (rest.to_vec(), Some(last.clone())),
        _ => (node.children.clone(), None),
    };

    Slide {
        index,
        text: parsed.text,
        children,
        note,
        layout: parsed.layout,
        collapsible: parsed.collapsible,
        view_type: node.view_type,
    }
}

/// How a slide is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideKind<'a> {
    /// No body: a heading, or a full-bleed image anchored at the bottom.
    Title {
        /// Image when the heading text is an image reference.
        image: Option<ImageRef<'a>>,
    },
    /// Heading plus bullet body, optionally beside an image column.
    Content(ContentLayout<'a>),
}

/// Column arrangement of a content slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout<'a> {
    /// Bullets rendered in the body column.
    pub bullets: &'a [OutlineNode],
    /// Image column, present for `image ...` layouts.
    pub aside: Option<ImageColumn<'a>>,
    /// Column order reversed (` left` layouts).
    pub reversed: bool,
}

impl ContentLayout<'_> {
    /// CSS width of the bullet column.
    pub fn bullet_width(&self) -> &'static str {
        if self.aside.is_some() { "50%" } else { "100%" }
    }
}

/// The layout-driving first child of an image layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageColumn<'a> {
    /// Raw text of the first child.
    pub text: &'a str,
    /// Parsed image, if the text is one.
    pub image: Option<ImageRef<'a>>,
}

impl Slide {
    /// True when the slide has body bullets.
    pub fn is_content(&self) -> bool {
        !self.children.is_empty()
    }

    /// Classifies the slide as title or content and resolves its columns.
    pub fn kind(&self) -> SlideKind<'_> {
        if self.children.is_empty() {
            return SlideKind::Title {
                image: find_image(&self.text),
            };
        }

        let reversed = self.layout.is_left();
        if self.layout.is_image() {
            let (first, rest) = self.children.split_at(1);
            let text = first[0].text.as_str();
            SlideKind::Content(ContentLayout {
                bullets: rest,
                aside: Some(ImageColumn {
                    text,
                    image: find_image(text),
                }),
                reversed,
            })
        } else {
            SlideKind::Content(ContentLayout {
                bullets: &self.children,
                aside: None,
                reversed,
            })
        }
    }

    /// Warnings about fallbacks taken while laying the slide out.
    pub fn layout_warnings(&self) -> Vec<DeckWarning> {
        let mut warnings = Vec::new();
        match self.kind() {
            SlideKind::Title { image: None } if is_broken_image(&self.text) => {
                warnings.push(DeckWarning::UnparsedImage {
                    slide: self.index,
                    text: self.text.clone(),
                });
            }
            SlideKind::Content(ContentLayout {
                aside: Some(ImageColumn { text, image: None }),
                ..
            }) => warnings.push(DeckWarning::ImageLayoutWithoutImage {
                slide: self.index,
                text: text.to_string(),
            }),
            _ => {}
        }
        warnings
    }
}
