#![deny(missing_docs)]
//! bulletdeck presentation layer: deck HTML, collapsible lists, auto-fit scaling, and the shell.

/// Collapsible list structure and toggle state.
pub mod collapsible;
/// Presentation options, themes, and engine settings.
pub mod config;
/// Keyboard shortcuts.
pub mod keys;
/// Markdown-to-HTML conversion for bullet markup.
pub mod markdown;
/// Deck and slide HTML rendering.
pub mod render;
/// Auto-fit scaling and image fitting.
pub mod scale;
/// Presentation lifecycle over a host.
pub mod shell;
/// Injected style sheets.
pub mod styles;
/// HTML rewrite passes over rendered bullets.
pub mod transform;

pub use collapsible::{Caret, CollapsibleState, CollapsibleTree, ItemId, ListItem, ToggleOutcome};
pub use config::{EngineConfig, Platform, PresentConfig, PresentOptions, Theme, Viewport};
pub use keys::{KeyAction, KeyEvent, classify_key};
pub use render::{RenderedDeck, RenderedSlide, SlideClass, compile_deck, render_deck};
pub use scale::{
    AutoFitScaler, ClassMutation, ImageFit, LayoutProbe, Measurement, ScaleUpdate, Transform,
    fit_image, fit_transform,
};
pub use shell::{
    EventKind, KeyOutcome, PresentationHost, Presenter, PresenterState, SubscriptionId,
};
pub use styles::{StyleRegistry, StyleSheet, print_stylesheet};
