//! Collapsible nested lists.
//!
//! The list structure of a slide's bullet markup is read once into an
//! immutable, depth-annotated [`CollapsibleTree`]. Visibility and caret state
//! live in [`CollapsibleState`], keyed by [`ItemId`], so toggling never has to
//! read anything back from the rendered page.

use crate::markdown::to_mdast;
use bulletdeck_core::DeckError;
use markdown::mdast::Node;
use serde::Serialize;
use std::collections::HashMap;

/// Position of a list item in document order (the n-th `<li>` of the slide).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub usize);

/// One list item with its nesting information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    /// Document-order id.
    pub id: ItemId,
    /// Number of list items enclosing this one, plus one.
    pub depth: usize,
    /// Closest enclosing list item.
    pub parent: Option<ItemId>,
    /// Items of the lists nested directly inside this one.
    pub children: Vec<ItemId>,
    /// Whether a nested list lives inside; such items get a caret.
    pub has_toggle: bool,
}

/// Depth-annotated list structure of one slide body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollapsibleTree {
    items: Vec<ListItem>,
    min_depth: usize,
}

impl CollapsibleTree {
    /// Reads the list structure of bullet markup.
    pub fn from_markup(markup: &str) -> Result<Self, DeckError> {
        Ok(Self::from_mdast(&to_mdast(markup)?))
    }

    /// Reads the list structure of a parsed document.
    pub fn from_mdast(root: &Node) -> Self {
        let mut items = Vec::new();
        collect_items(root, None, 0, &mut items);
        let min_depth = items.iter().map(|item| item.depth).min().unwrap_or(0);
        Self { items, min_depth }
    }

    /// All items in document order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Looks up one item.
    pub fn item(&self, id: ItemId) -> Option<&ListItem> {
        self.items.get(id.0)
    }

    /// Shallowest depth present; zero when there are no items.
    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the body has no list items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn collect_items(node: &Node, parent: Option<ItemId>, depth: usize, items: &mut Vec<ListItem>) {
    if let Node::ListItem(list_item) = node {
        let id = ItemId(items.len());
        items.push(ListItem {
            id,
            depth: depth + 1,
            parent,
            children: Vec::new(),
            has_toggle: list_item.children.iter().any(contains_list),
        });
        if let Some(parent) = parent {
            items[parent.0].children.push(id);
        }
        for child in &list_item.children {
            collect_items(child, Some(id), depth + 1, items);
        }
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_items(child, parent, depth, items);
        }
    }
}

fn contains_list(node: &Node) -> bool {
    matches!(node, Node::List(_))
        || node
            .children()
            .is_some_and(|children| children.iter().any(contains_list))
}

/// Toggle affordance orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Caret {
    /// Collapsed, pointing right.
    Right,
    /// Expanded, pointing down.
    Down,
}

impl Caret {
    /// Base class carried by every caret.
    pub const CLASS: &'static str = "deck-caret";

    /// Full class attribute value.
    pub fn class_name(self) -> &'static str {
        match self {
            Caret::Right => "deck-caret deck-caret--right",
            Caret::Down => "deck-caret deck-caret--down",
        }
    }

    fn from_expanded(expanded: bool) -> Self {
        if expanded { Caret::Down } else { Caret::Right }
    }
}

/// What changed after a toggle; the host applies it to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// The toggled item.
    pub item: ItemId,
    /// New caret orientation.
    pub caret: Caret,
    /// Items whose own visibility flag changed, with the new value.
    pub changed: Vec<(ItemId, bool)>,
}

/// Expand/collapse state for one slide.
#[derive(Debug, Clone)]
pub struct CollapsibleState {
    tree: CollapsibleTree,
    visible: HashMap<ItemId, bool>,
    expanded: HashMap<ItemId, bool>,
    initialized: bool,
}

impl CollapsibleState {
    /// Wraps a tree; nothing is hidden until [`materialize`](Self::materialize).
    pub fn new(tree: CollapsibleTree) -> Self {
        Self {
            tree,
            visible: HashMap::new(),
            expanded: HashMap::new(),
            initialized: false,
        }
    }

    /// Shows the shallowest items and hides the rest. Runs once; later calls
    /// return `false` and change nothing.
    pub fn materialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        let min_depth = self.tree.min_depth();
        for item in self.tree.items() {
            self.visible.insert(item.id, item.depth == min_depth);
            self.expanded.insert(item.id, false);
        }
        self.initialized = true;
        true
    }

    /// Whether [`materialize`](Self::materialize) already ran.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The underlying tree.
    pub fn tree(&self) -> &CollapsibleTree {
        &self.tree
    }

    /// Own visibility flag of an item (its `display` style).
    pub fn is_visible(&self, id: ItemId) -> bool {
        self.visible.get(&id).copied().unwrap_or(true)
    }

    /// Whether the item actually shows: it and every ancestor are visible.
    pub fn is_displayed(&self, id: ItemId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            if !self.is_visible(id) {
                return false;
            }
            current = self.tree.item(id).and_then(|item| item.parent);
        }
        true
    }

    /// Caret orientation of an item with a nested list.
    pub fn caret(&self, id: ItemId) -> Option<Caret> {
        let item = self.tree.item(id)?;
        item.has_toggle
            .then(|| Caret::from_expanded(self.expanded.get(&id).copied().unwrap_or(false)))
    }

    /// Flips an item: its directly nested items are shown or hidden together.
    ///
    /// Items deeper down keep their own flags, and sibling subtrees are not
    /// touched. Returns `None` for unknown items and items without a caret.
    pub fn toggle(&mut self, id: ItemId) -> Option<ToggleOutcome> {
        let item = self.tree.item(id)?;
        if !item.has_toggle {
            return None;
        }
        let targets: Vec<ItemId> = self.nearest_descendants(id);
        self.materialize();

        let expanded = !self.expanded.get(&id).copied().unwrap_or(false);
        self.expanded.insert(id, expanded);
        let changed = targets
            .into_iter()
            .map(|target| {
                self.visible.insert(target, expanded);
                (target, expanded)
            })
            .collect();

        Some(ToggleOutcome {
            item: id,
            caret: Caret::from_expanded(expanded),
            changed,
        })
    }

    /// Descendants of `id` at the smallest depth found below it.
    fn nearest_descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut descendants = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(item) = self.tree.item(current) {
                for child in &item.children {
                    descendants.push(*child);
                    stack.push(*child);
                }
            }
        }
        let Some(min_depth) = descendants
            .iter()
            .filter_map(|d| self.tree.item(*d).map(|item| item.depth))
            .min()
        else {
            return Vec::new();
        };
        let mut nearest: Vec<ItemId> = descendants
            .into_iter()
            .filter(|d| self.tree.item(*d).is_some_and(|item| item.depth == min_depth))
            .collect();
        nearest.sort();
        nearest
    }

    /// Ids of every item that currently shows.
    pub fn displayed(&self) -> Vec<ItemId> {
        self.tree
            .items()
            .iter()
            .map(|item| item.id)
            .filter(|id| self.is_displayed(*id))
            .collect()
    }
}
