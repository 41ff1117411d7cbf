//! HTML for individual slides.

use crate::collapsible::{CollapsibleState, CollapsibleTree};
use crate::markdown::to_html;
use crate::transform::carets::apply_collapsible;
use bulletdeck_core::{
    ContentLayout, DeckError, ImageColumn, ImageRef, OutlineNode, RefResolver, Slide, SlideKind,
    render_bullet, render_bullets,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

/// Class of the bullet wrapper that gets scaled to fit.
pub const BULLETS_CLASS: &str = "deck-bullets";
/// Class of the measured element inside the bullet wrapper.
pub const BULLETS_CONTENT_CLASS: &str = "deck-bullets__content";

/// HTML for one slide plus the collapsible structure of its body, if any.
pub(crate) struct SlideHtml {
    pub(crate) html: String,
    pub(crate) collapsible: Option<CollapsibleTree>,
}

pub(crate) fn render_slide<R: RefResolver + ?Sized>(
    slide: &Slide,
    resolver: &R,
) -> Result<SlideHtml, DeckError> {
    let mut html = String::new();
    let mut collapsible = None;
    match slide.kind() {
        SlideKind::Title { image } => {
            render_title(&mut html, &resolver.resolve(&slide.text), image.as_ref());
        }
        SlideKind::Content(layout) => {
            collapsible = render_content(&mut html, slide, &layout, resolver)?;
        }
    }
    if let Some(note) = &slide.note {
        render_note(&mut html, note, resolver)?;
    }
    html.push_str("</section>");
    Ok(SlideHtml { html, collapsible })
}

fn render_title(html: &mut String, text: &str, image: Option<&ImageRef<'_>>) {
    match image {
        Some(image) => {
            html.push_str("<section style=\"bottom: 0\">");
            push_image(html, image);
        }
        None => {
            write!(html, "<section><h1>{}</h1>", encode_text(text)).ok();
        }
    }
}

fn render_content<R: RefResolver + ?Sized>(
    html: &mut String,
    slide: &Slide,
    layout: &ContentLayout<'_>,
    resolver: &R,
) -> Result<Option<CollapsibleTree>, DeckError> {
    let direction = if layout.reversed { "row-reverse" } else { "row" };
    write!(
        html,
        "<section style=\"text-align: left\"><h1>{}</h1>\
         <div class=\"r-stretch\" style=\"display: flex; flex-direction: {}\">\
         <div class=\"{}\" data-slide=\"{}\" style=\"width: {}; transform-origin: left top\">\
         <div class=\"{}\">",
        encode_text(&resolver.resolve(&slide.text)),
        direction,
        BULLETS_CLASS,
        slide.index,
        layout.bullet_width(),
        BULLETS_CONTENT_CLASS,
    )
    .ok();

    let markup = render_bullets(layout.bullets, Some(slide.view_type), resolver);
    let mut body = to_html(&markup)?;
    let mut tree = None;
    if slide.collapsible {
        let mut state = CollapsibleState::new(CollapsibleTree::from_markup(&markup)?);
        state.materialize();
        body = apply_collapsible(&body, &state)?;
        tree = Some(state.tree().clone());
    }
    html.push_str(&body);
    html.push_str("</div></div>");

    if let Some(aside) = &layout.aside {
        render_aside(html, aside);
    }
    html.push_str("</div>");
    Ok(tree)
}

fn render_aside(html: &mut String, aside: &ImageColumn<'_>) {
    html.push_str("<div class=\"deck-aside\" style=\"width: 50%; text-align: center; align-self: center\">");
    match &aside.image {
        Some(image) => push_image(html, image),
        None => {
            log::warn!("Image layout without an image in the first child: {}", aside.text);
            html.push_str("<div></div>");
        }
    }
    html.push_str("</div>");
}

fn render_note<R: RefResolver + ?Sized>(
    html: &mut String,
    note: &OutlineNode,
    resolver: &R,
) -> Result<(), DeckError> {
    let markup = render_bullet(note, 0, None, resolver);
    html.push_str("<aside class=\"notes\">");
    html.push_str(&to_html(&markup)?);
    html.push_str("</aside>");
    Ok(())
}

fn push_image(html: &mut String, image: &ImageRef<'_>) {
    write!(
        html,
        "<img alt=\"{}\" src=\"{}\">",
        encode_double_quoted_attribute(image.alt),
        encode_double_quoted_attribute(image.src)
    )
    .ok();
}
