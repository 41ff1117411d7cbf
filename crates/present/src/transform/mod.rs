//! HTML rewrite passes applied to rendered bullet markup.
//!
//! - `carets`: injects collapsible carets, item ids, and initial visibility into `<li>` elements.

/// Collapsible caret and visibility injection.
pub mod carets;
