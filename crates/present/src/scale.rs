//! Auto-fit scaling of slide bodies and image fitting.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Class the slideshow engine puts on the slide being shown.
pub const ACTIVE_CLASS: &str = "present";

/// Transform applied to a bullet wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transform {
    /// No transform.
    Identity,
    /// Uniform scale anchored top-left.
    Scale {
        /// Scale factor in `(0, 1)`.
        factor: f64,
    },
}

impl Transform {
    /// Value for the CSS `transform` property.
    pub fn css(self) -> String {
        match self {
            Transform::Identity => "initial".to_string(),
            Transform::Scale { factor } => format!("scale({factor})"),
        }
    }
}

/// Transform that makes content of `content_height` fit a box of `box_height`.
///
/// Returns `None` while the box has not been laid out (zero, negative, or
/// non-finite height), so the caller skips this cycle.
///
/// ```
/// use bulletdeck_present::scale::{Transform, fit_transform};
///
/// assert_eq!(fit_transform(800.0, 400.0), Some(Transform::Scale { factor: 0.5 }));
/// assert_eq!(fit_transform(300.0, 400.0), Some(Transform::Identity));
/// assert_eq!(fit_transform(300.0, 0.0), None);
/// ```
pub fn fit_transform(content_height: f64, box_height: f64) -> Option<Transform> {
    if !box_height.is_finite() || box_height <= 0.0 {
        return None;
    }
    if content_height.is_finite() && content_height > box_height {
        Some(Transform::Scale {
            factor: box_height / content_height,
        })
    } else {
        Some(Transform::Identity)
    }
}

/// A class attribute change observed on an element of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMutation {
    /// Slide the mutated element belongs to.
    pub slide: usize,
    /// New class attribute value.
    pub class_name: String,
}

impl ClassMutation {
    /// Whether the element is now the active slide.
    pub fn is_activation(&self) -> bool {
        self.class_name
            .split_ascii_whitespace()
            .any(|class| class == ACTIVE_CLASS)
    }
}

/// Reads rendered heights of a slide's bullet wrapper.
pub trait LayoutProbe {
    /// Box height of the wrapper, `None` when the slide has no wrapper.
    fn box_height(&self, slide: usize) -> Option<f64>;
    /// Height of the wrapper's content.
    fn content_height(&self, slide: usize) -> Option<f64>;
}

/// Heights measured by the host for one slide.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Box height of the bullet wrapper.
    pub box_height: f64,
    /// Content height inside the wrapper.
    pub content_height: f64,
}

impl LayoutProbe for HashMap<usize, Measurement> {
    fn box_height(&self, slide: usize) -> Option<f64> {
        self.get(&slide).map(|m| m.box_height)
    }

    fn content_height(&self, slide: usize) -> Option<f64> {
        self.get(&slide).map(|m| m.content_height)
    }
}

/// A transform the host should set on a slide's bullet wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleUpdate {
    /// Slide index.
    pub slide: usize,
    /// New transform.
    pub transform: Transform,
}

/// Rescales slide bodies when slides become active.
///
/// Fed whole batches of class mutations. A slide appearing several times in a
/// batch is measured once, and an update is only emitted when the transform
/// differs from the one last applied.
#[derive(Debug, Default)]
pub struct AutoFitScaler {
    applied: HashMap<usize, Transform>,
}

impl AutoFitScaler {
    /// Creates a scaler with nothing applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one batch of mutations.
    pub fn on_mutations<P: LayoutProbe + ?Sized>(
        &mut self,
        batch: &[ClassMutation],
        probe: &P,
    ) -> Vec<ScaleUpdate> {
        let mut seen = HashSet::new();
        let mut updates = Vec::new();
        for mutation in batch.iter().filter(|m| m.is_activation()) {
            if !seen.insert(mutation.slide) {
                continue;
            }
            let Some(box_height) = probe.box_height(mutation.slide) else {
                continue;
            };
            let content_height = probe.content_height(mutation.slide).unwrap_or(0.0);
            let Some(transform) = fit_transform(content_height, box_height) else {
                log::warn!(
                    "Slide {} not laid out yet (box height {}), skipping scale",
                    mutation.slide,
                    box_height
                );
                continue;
            };
            let previous = self
                .applied
                .get(&mutation.slide)
                .copied()
                .unwrap_or(Transform::Identity);
            if previous != transform {
                self.applied.insert(mutation.slide, transform);
                updates.push(ScaleUpdate {
                    slide: mutation.slide,
                    transform,
                });
            }
        }
        updates
    }

    /// Transform last applied to a slide.
    pub fn applied(&self, slide: usize) -> Transform {
        self.applied
            .get(&slide)
            .copied()
            .unwrap_or(Transform::Identity)
    }
}

/// How an image fills its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    /// Image is wider than the box: full width, auto height.
    FullWidth,
    /// Image is taller than the box: full height, auto width.
    FullHeight,
}

impl ImageFit {
    /// Inline style for the `<img>` element.
    pub fn css(self) -> &'static str {
        match self {
            ImageFit::FullWidth => "width: 100%; height: auto",
            ImageFit::FullHeight => "height: 100%; width: auto",
        }
    }
}

/// Compares aspect ratios once an image has loaded.
///
/// Returns `None` when either ratio is not a finite number (image or box not
/// measured yet); the style is then left alone for this frame.
pub fn fit_image(image_width: f64, image_height: f64, box_width: f64, box_height: f64) -> Option<ImageFit> {
    let image_ratio = image_width / image_height;
    let box_ratio = box_width / box_height;
    if !image_ratio.is_finite() || !box_ratio.is_finite() {
        return None;
    }
    Some(if image_ratio > box_ratio {
        ImageFit::FullWidth
    } else {
        ImageFit::FullHeight
    })
}
