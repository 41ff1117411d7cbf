//! Outline snapshot model supplied by the host application.

use crate::DeckError;
use serde::{Deserialize, Serialize};

/// Rendering mode of an outline node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// Unordered `- ` items.
    #[default]
    Bullet,
    /// Ordered `1. ` items.
    Numbered,
    /// No list marker and no extra indentation.
    Document,
}

impl ViewType {
    /// List marker emitted in front of a child of a node with this view type.
    pub fn marker(self) -> &'static str {
        match self {
            ViewType::Bullet => "- ",
            ViewType::Numbered => "1. ",
            ViewType::Document => "",
        }
    }
}

/// Marker for a child whose parent view type is known (or absent, which means bullet).
pub fn marker_for(parent: Option<ViewType>) -> &'static str {
    parent.unwrap_or_default().marker()
}

/// One item of the host outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    /// Raw line content, possibly carrying directives or an image reference.
    pub text: String,
    /// Ordered child nodes.
    #[serde(default)]
    pub children: Vec<OutlineNode>,
    /// Markdown heading depth (1-based) when the node is a heading.
    #[serde(default, alias = "headingLevel", skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    /// Whether the children are expanded in the outline.
    #[serde(default = "default_open", alias = "isExpanded")]
    pub open: bool,
    /// How this node's children are displayed.
    #[serde(default, alias = "view-type")]
    pub view_type: ViewType,
}

fn default_open() -> bool {
    true
}

impl OutlineNode {
    /// Creates an open bullet node without children.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
            heading: None,
            open: true,
            view_type: ViewType::Bullet,
        }
    }

    /// Replaces the children.
    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }

    /// Sets the heading level.
    pub fn with_heading(mut self, level: u8) -> Self {
        self.heading = Some(level);
        self
    }

    /// Sets the view type.
    pub fn with_view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = view_type;
        self
    }

    /// Marks the node as collapsed.
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    /// Children that take part in rendering; a closed node has none.
    pub fn visible_children(&self) -> &[OutlineNode] {
        if self.open { &self.children } else { &[] }
    }
}

/// A full outline snapshot: the top-level nodes, one per slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline {
    /// Top-level nodes in document order.
    pub nodes: Vec<OutlineNode>,
}

impl Outline {
    /// Wraps already-built nodes.
    pub fn new(nodes: Vec<OutlineNode>) -> Self {
        Self { nodes }
    }

    /// Parses a JSON array of outline nodes.
    pub fn from_json(input: &str) -> Result<Self, DeckError> {
        serde_json::from_str(input).map_err(|err| DeckError::OutlineParse {
            format: "json",
            message: err.to_string(),
        })
    }

    /// Parses a YAML sequence of outline nodes. An empty document is an empty outline.
    pub fn from_yaml(input: &str) -> Result<Self, DeckError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|err| DeckError::OutlineParse {
            format: "yaml",
            message: err.to_string(),
        })
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the outline has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<Vec<OutlineNode>> for Outline {
    fn from(nodes: Vec<OutlineNode>) -> Self {
        Self::new(nodes)
    }
}
