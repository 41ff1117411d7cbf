//! Style sheets the presentation injects into the page.
//!
//! A [`StyleRegistry`] is handed to the presenter when it is built. It knows
//! every sheet the host registered and which of them this presentation has
//! attached, so close can detach exactly those.

use crate::config::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Id of the print-only sheet.
pub const PRINT_STYLE_ID: &str = "bulletdeck-print.css";
/// Id suffix of the slideshow engine's base sheet.
pub const ENGINE_STYLE_SUFFIX: &str = "reveal.css";
/// Element id of the overlay container.
pub const CONTAINER_ID: &str = "bulletdeck-presentation-container";
/// Element id of the deck root inside the container.
pub const DECK_ROOT_ID: &str = "bulletdeck-root";

/// A style element the host can attach to the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Element id, unique within the registry.
    pub id: String,
    /// CSS text.
    pub css: String,
}

impl StyleSheet {
    /// Creates a sheet.
    pub fn new(id: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            css: css.into(),
        }
    }
}

/// Hides everything but the deck while printing.
pub fn print_stylesheet() -> StyleSheet {
    let css = format!(
        "@media print {{
  body * {{
    visibility: hidden;
  }}
  #{CONTAINER_ID} #{DECK_ROOT_ID} * {{
    visibility: visible;
  }}
  #{CONTAINER_ID} * {{
    position: absolute;
    left: 0;
    top: 0;
  }}
}}"
    );
    StyleSheet::new(PRINT_STYLE_ID, css)
}

/// Owned set of injectable style sheets.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    sheets: Vec<StyleSheet>,
    attached: BTreeSet<String>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from sheets; later duplicates replace earlier ones.
    pub fn with_sheets(sheets: impl IntoIterator<Item = StyleSheet>) -> Self {
        let mut registry = Self::new();
        for sheet in sheets {
            registry.register(sheet);
        }
        registry
    }

    /// Adds a sheet, replacing any sheet with the same id.
    pub fn register(&mut self, sheet: StyleSheet) {
        match self.sheets.iter_mut().find(|existing| existing.id == sheet.id) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Looks up a sheet by id.
    pub fn get(&self, id: &str) -> Option<&StyleSheet> {
        self.sheets.iter().find(|sheet| sheet.id == id)
    }

    /// Ids of the sheets a theme needs: the engine base sheet and the theme sheet.
    pub fn theme_sheet_ids(&self, theme: Theme) -> Vec<String> {
        let suffix = theme.stylesheet_suffix();
        self.sheets
            .iter()
            .filter(|sheet| sheet.id.ends_with(&suffix) || sheet.id.ends_with(ENGINE_STYLE_SUFFIX))
            .map(|sheet| sheet.id.clone())
            .collect()
    }

    /// Marks a sheet attached. Returns it only when it was not attached yet,
    /// so callers inject each element once.
    pub fn attach(&mut self, id: &str) -> Option<&StyleSheet> {
        let index = self.sheets.iter().position(|sheet| sheet.id == id)?;
        if !self.attached.insert(id.to_string()) {
            return None;
        }
        self.sheets.get(index)
    }

    /// Marks a sheet detached. Returns whether it was attached.
    pub fn detach(&mut self, id: &str) -> bool {
        self.attached.remove(id)
    }

    /// Whether a sheet is attached.
    pub fn is_attached(&self, id: &str) -> bool {
        self.attached.contains(id)
    }

    /// Detaches everything, returning the ids to remove from the page.
    pub fn release_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.attached).into_iter().collect()
    }

    /// Number of attached sheets.
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}
