//! Outline-to-markdown bullet rendering.
//!
//! Each node becomes one line: `indent + marker + heading prefix + text`.
//! The marker comes from the *parent's* view type, indentation is four
//! spaces per level, and image-only lines get no marker at all. A node whose
//! own view type is `document` keeps its children at its own depth, so the
//! logical structure survives without extra visual nesting.

use crate::image::has_image;
use crate::outline::{OutlineNode, ViewType, marker_for};
use crate::resolve::RefResolver;

const INDENT_WIDTH: usize = 4;

/// Renders one node and its open descendants as markdown list markup.
pub fn render_bullet<R: RefResolver + ?Sized>(
    node: &OutlineNode,
    depth: usize,
    parent_view: Option<ViewType>,
    resolver: &R,
) -> String {
    let mut out = String::new();
    write_bullet(&mut out, node, depth, parent_view, resolver);
    out
}

/// Renders sibling nodes, one after another, separated by newlines.
pub fn render_bullets<R: RefResolver + ?Sized>(
    nodes: &[OutlineNode],
    parent_view: Option<ViewType>,
    resolver: &R,
) -> String {
    let mut out = String::new();
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_bullet(&mut out, node, 0, parent_view, resolver);
    }
    out
}

fn write_bullet<R: RefResolver + ?Sized>(
    out: &mut String,
    node: &OutlineNode,
    depth: usize,
    parent_view: Option<ViewType>,
    resolver: &R,
) {
    out.extend(std::iter::repeat_n(' ', depth * INDENT_WIDTH));
    if !has_image(&node.text) {
        out.push_str(marker_for(parent_view));
    }
    if let Some(level) = node.heading.filter(|level| *level > 0) {
        out.extend(std::iter::repeat_n('#', usize::from(level)));
        out.push(' ');
    }
    out.push_str(&resolver.resolve(&node.text));

    let child_depth = if node.view_type == ViewType::Document {
        depth
    } else {
        depth + 1
    };
    for child in node.visible_children() {
        out.push('\n');
        write_bullet(out, child, child_depth, Some(node.view_type), resolver);
    }
}
