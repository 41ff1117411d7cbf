#![deny(missing_docs)]
//! bulletdeck core: outline model, slide directives, bullet markup, and slide classification.

/// Outline-to-markdown bullet rendering.
pub mod bullets;
/// Slide heading directive parsing.
pub mod directives;
/// Core error and diagnostic types.
pub mod error;
/// Image reference detection.
pub mod image;
/// Marker cycling for edited outline text.
pub mod markers;
/// Outline snapshot model and loaders.
pub mod outline;
/// Cross-reference resolution hook.
pub mod resolve;
/// Slide derivation and classification.
pub mod slides;

pub use bullets::{render_bullet, render_bullets};
pub use directives::{DirectiveIssue, Layout, SlideDirectives, extract_directives};
pub use error::{DeckError, DeckWarning, Diagnostics, SourceLocation};
pub use image::{ImageRef, find_image, has_image};
pub use markers::{MarkerEdit, cycle_marker, is_cycle_chord};
pub use outline::{Outline, OutlineNode, ViewType};
pub use resolve::{IdentityResolver, RefResolver};
pub use slides::{ContentLayout, ImageColumn, Slide, SlideKind, derive_slides};
