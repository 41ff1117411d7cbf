//! Writes collapsible state into the `<li>` elements of rendered bullets.

use crate::collapsible::{Caret, CollapsibleState, ItemId};
use bulletdeck_core::DeckError;
use lol_html::html_content::ContentType;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str};
use std::borrow::Cow;

/// Attribute carrying the item id on `<li>` elements and carets.
pub const ITEM_ATTR: &str = "data-deck-item";

/// Per-`<li>` snapshot handed to the rewrite handler.
#[derive(Debug, Clone, Copy)]
struct ItemMarkup {
    id: ItemId,
    visible: bool,
    caret: Option<Caret>,
}

/// Caret element placed as the first child of a toggleable `<li>`.
pub fn caret_html(id: ItemId, caret: Caret) -> String {
    format!(
        "<span class=\"{}\" {}=\"{}\" role=\"button\"></span>",
        caret.class_name(),
        ITEM_ATTR,
        id.0
    )
}

/// Returns lol_html handlers that annotate `<li>` elements in document order.
fn list_item_handlers(
    state: &CollapsibleState,
) -> Vec<(Cow<'static, Selector>, ElementContentHandlers<'static>)> {
    let items: Vec<ItemMarkup> = state
        .tree()
        .items()
        .iter()
        .map(|item| ItemMarkup {
            id: item.id,
            visible: state.is_visible(item.id),
            caret: state.caret(item.id),
        })
        .collect();
    let mut next = 0usize;

    vec![element!("li", move |el| {
        let index = next;
        next += 1;
        let Some(item) = items.get(index) else {
            return Ok(());
        };

        let display = if item.visible { "list-item" } else { "none" };
        el.set_attribute(ITEM_ATTR, &item.id.0.to_string())?;
        match item.caret {
            Some(caret) => {
                el.set_attribute("style", &format!("position: relative; display: {display}"))?;
                el.prepend(&caret_html(item.id, caret), ContentType::Html);
            }
            None => el.set_attribute("style", &format!("display: {display}"))?,
        }
        Ok(())
    })]
}

/// Rewrites rendered bullet HTML so it reflects `state`.
pub fn apply_collapsible(html: &str, state: &CollapsibleState) -> Result<String, DeckError> {
    if state.tree().is_empty() {
        return Ok(html.to_string());
    }
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: list_item_handlers(state),
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| DeckError::Rewrite(err.to_string()))
}
