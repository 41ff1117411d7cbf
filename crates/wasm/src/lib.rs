use bulletdeck_core::{DeckError, Outline, RefResolver};
use bulletdeck_present::{
    ClassMutation, EngineConfig, EventKind, ItemId, KeyEvent, KeyOutcome, Measurement, Platform,
    PresentConfig, PresentOptions, PresentationHost, Presenter, PresenterState, SlideClass,
    StyleRegistry, StyleSheet, SubscriptionId, Theme, Viewport,
};
use js_sys::{Array, Function, Reflect};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Options
// ============================================================================

/// Options accepted by `render_deck` and the `Presentation` constructor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmOptions {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default, alias = "showNotes")]
    pub notes: Option<String>,
    #[serde(default)]
    pub platform: Option<Platform>,
}

impl WasmOptions {
    fn config(&self) -> PresentConfig {
        let options = PresentOptions {
            theme: self.theme.clone(),
            notes: self.notes.clone(),
        };
        PresentConfig::from_options(&options, self.platform.unwrap_or_default())
    }
}

fn parse_options(options: JsValue) -> Result<WasmOptions, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(WasmOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn deck_error(err: DeckError) -> JsError {
    JsError::new(&err.to_string())
}

// ============================================================================
// Reference resolution
// ============================================================================

/// Calls a JS `resolveRefs(text)` function; non-string results keep the text.
struct JsResolver(Option<Function>);

impl RefResolver for JsResolver {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(resolve) = &self.0 else {
            return Cow::Borrowed(text);
        };
        match resolve
            .call1(&JsValue::NULL, &JsValue::from_str(text))
            .ok()
            .and_then(|value| value.as_string())
        {
            Some(resolved) => Cow::Owned(resolved),
            None => Cow::Borrowed(text),
        }
    }
}

// ============================================================================
// Render API
// ============================================================================

/// Rendered deck as handed back to JavaScript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckResult {
    /// Deck root HTML.
    pub html: String,
    /// Per-slide HTML and classification.
    pub slides: Vec<SlideResult>,
    /// Fallback messages.
    pub warnings: Vec<String>,
}

/// One slide of a [`DeckResult`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideResult {
    pub index: usize,
    pub kind: SlideClass,
    pub html: String,
    pub collapsible: bool,
}

/// Renders an outline snapshot (`OutlineNode[]`) into deck HTML.
///
/// # Arguments
///
/// * `outline` - Array of outline nodes (`{ text, children, heading, open, viewType }`)
/// * `options` - Optional `{ theme, notes, platform }`
/// * `resolve_refs` - Optional function expanding references in node text
#[wasm_bindgen]
pub fn render_deck(
    outline: JsValue,
    options: JsValue,
    resolve_refs: Option<Function>,
) -> Result<JsValue, JsError> {
    let outline: Outline = serde_wasm_bindgen::from_value(outline)
        .map_err(|e| JsError::new(&format!("Invalid outline: {}", e)))?;
    let config = parse_options(options)?.config();
    let deck = bulletdeck_present::compile_deck(&outline, &config, &JsResolver(resolve_refs))
        .map_err(deck_error)?;

    let result = DeckResult {
        warnings: deck.warning_messages(),
        slides: deck
            .slides
            .iter()
            .map(|slide| SlideResult {
                index: slide.index,
                kind: slide.class,
                html: slide.html.clone(),
                collapsible: slide.collapsible.is_some(),
            })
            .collect(),
        html: deck.html,
    };
    to_js(&result)
}

/// CSS `transform` for a bullet wrapper, or `undefined` while the box has no height.
#[wasm_bindgen]
pub fn fit_scale(content_height: f64, box_height: f64) -> Option<String> {
    bulletdeck_present::fit_transform(content_height, box_height).map(|t| t.css())
}

/// Inline `<img>` style for an image in a box, or `undefined` when unmeasured.
#[wasm_bindgen]
pub fn fit_image(image_width: f64, image_height: f64, box_width: f64, box_height: f64) -> Option<String> {
    bulletdeck_present::fit_image(image_width, image_height, box_width, box_height)
        .map(|fit| fit.css().to_string())
}

/// Theme that will actually be used for a requested name.
#[wasm_bindgen]
pub fn normalize_theme(theme: Option<String>, safari: bool) -> String {
    let platform = if safari { Platform::Safari } else { Platform::Other };
    Theme::normalize(theme.as_deref(), platform).as_str().to_string()
}

/// Cycles the archive marker of a block being edited.
///
/// Returns `{ value, selectionStart, selectionEnd }`.
#[wasm_bindgen]
pub fn cycle_marker(value: &str, selection_start: usize, selection_end: usize) -> Result<JsValue, JsError> {
    to_js(&bulletdeck_core::cycle_marker(value, selection_start, selection_end))
}

/// Whether a keydown is the marker-cycling chord.
#[wasm_bindgen]
pub fn is_cycle_chord(key: &str, shift: bool, ctrl: bool, in_text_area: bool) -> bool {
    bulletdeck_core::is_cycle_chord(key, shift, ctrl, in_text_area)
}

// ============================================================================
// Presentation API
// ============================================================================

/// Host backed by an object of JS callbacks. Missing callbacks are no-ops.
struct JsHost {
    callbacks: JsValue,
    next_id: u64,
}

impl JsHost {
    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let callback = Reflect::get(&self.callbacks, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let array: Array = args.iter().collect();
        callback.apply(&self.callbacks, &array).ok()
    }
}

fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::KeyDown => "keydown",
        EventKind::LayoutChange => "layoutchange",
        EventKind::AfterPrint => "afterprint",
    }
}

impl PresentationHost for JsHost {
    fn fetch_outline(&mut self) -> Result<Outline, DeckError> {
        let value = self.call("getSlides", &[]).ok_or_else(|| DeckError::OutlineParse {
            format: "js",
            message: "getSlides is missing or threw".to_string(),
        })?;
        serde_wasm_bindgen::from_value(value).map_err(|e| DeckError::OutlineParse {
            format: "js",
            message: e.to_string(),
        })
    }

    fn resolve_refs<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self
            .call("resolveRefs", &[JsValue::from_str(text)])
            .and_then(|value| value.as_string())
        {
            Some(resolved) => Cow::Owned(resolved),
            None => Cow::Borrowed(text),
        }
    }

    fn viewport(&self) -> Viewport {
        self.call("viewport", &[])
            .and_then(|value| serde_wasm_bindgen::from_value(value).ok())
            .unwrap_or(Viewport {
                width: 960.0,
                height: 700.0,
            })
    }

    fn show_overlay(&mut self, html: &str) {
        self.call("showOverlay", &[JsValue::from_str(html)]);
    }

    fn hide_overlay(&mut self) {
        self.call("hideOverlay", &[]);
    }

    fn attach_style(&mut self, sheet: &StyleSheet) {
        self.call(
            "attachStyle",
            &[JsValue::from_str(&sheet.id), JsValue::from_str(&sheet.css)],
        );
    }

    fn detach_style(&mut self, id: &str) {
        self.call("detachStyle", &[JsValue::from_str(id)]);
    }

    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        self.next_id += 1;
        let fallback = self.next_id;
        let id = self
            .call("subscribe", &[JsValue::from_str(event_name(kind))])
            .and_then(|value| value.as_f64())
            .map(|id| id as u64)
            .unwrap_or(fallback);
        SubscriptionId(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.call("unsubscribe", &[JsValue::from_f64(id.0 as f64)]);
    }

    fn init_engine(&mut self, config: &EngineConfig) {
        if let Ok(config) = serde_wasm_bindgen::to_value(config) {
            self.call("initEngine", &[config]);
        }
    }

    fn destroy_engine(&mut self) {
        self.call("destroyEngine", &[]);
    }

    fn print(&mut self) {
        self.call("print", &[]);
    }
}

/// Heights of one slide's bullet wrapper, as measured by the page.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlideMeasurement {
    slide: usize,
    box_height: f64,
    content_height: f64,
}

#[derive(Debug, Clone, Serialize)]
struct ScaleResult {
    slide: usize,
    transform: String,
}

/// Presentation shell driven from JavaScript.
#[wasm_bindgen]
pub struct Presentation {
    inner: Presenter<JsHost>,
}

#[wasm_bindgen]
impl Presentation {
    /// Creates a closed presentation.
    ///
    /// * `host` - Object with callbacks (`getSlides`, `resolveRefs`, `viewport`,
    ///   `showOverlay`, `hideOverlay`, `attachStyle`, `detachStyle`, `subscribe`,
    ///   `unsubscribe`, `initEngine`, `destroyEngine`, `print`)
    /// * `options` - Optional `{ theme, notes, platform }`
    /// * `styles` - Optional array of `{ id, css }` sheets the host can inject
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, options: JsValue, styles: JsValue) -> Result<Presentation, JsError> {
        let config = parse_options(options)?.config();
        let sheets: Vec<StyleSheet> = if styles.is_undefined() || styles.is_null() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(styles)
                .map_err(|e| JsError::new(&format!("Invalid styles: {}", e)))?
        };
        let host = JsHost {
            callbacks: host,
            next_id: 0,
        };
        Ok(Presentation {
            inner: Presenter::new(host, config, StyleRegistry::with_sheets(sheets)),
        })
    }

    /// Opens the presentation; `false` when already open.
    pub fn open(&mut self) -> Result<bool, JsError> {
        self.inner.open().map_err(deck_error)
    }

    /// Closes the presentation; `false` when already closed.
    pub fn close(&mut self) -> bool {
        self.inner.close()
    }

    /// Handles a keydown; returns `"ignored"`, `"closed"` or `"print"`.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, event: JsValue) -> Result<String, JsError> {
        let event: KeyEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsError::new(&format!("Invalid key event: {}", e)))?;
        Ok(match self.inner.handle_key(&event) {
            KeyOutcome::Ignored => "ignored",
            KeyOutcome::Closed => "closed",
            KeyOutcome::Print => "print",
        }
        .to_string())
    }

    /// Print-completion callback.
    #[wasm_bindgen(js_name = afterPrint)]
    pub fn after_print(&mut self) -> bool {
        self.inner.after_print()
    }

    /// Toggles list item `item` on `slide`; returns the outcome or `null`.
    pub fn toggle(&mut self, slide: usize, item: usize) -> Result<JsValue, JsError> {
        match self.inner.toggle(slide, ItemId(item)).map_err(deck_error)? {
            Some(outcome) => to_js(&outcome),
            None => Ok(JsValue::NULL),
        }
    }

    /// Handles a batch of `{ slide, className }` mutations given
    /// `{ slide, boxHeight, contentHeight }` measurements.
    ///
    /// Returns `[{ slide, transform }]` with CSS transform values to apply.
    #[wasm_bindgen(js_name = onLayoutChange)]
    pub fn on_layout_change(&mut self, mutations: JsValue, measurements: JsValue) -> Result<JsValue, JsError> {
        let batch: Vec<ClassMutation> = serde_wasm_bindgen::from_value(mutations)
            .map_err(|e| JsError::new(&format!("Invalid mutations: {}", e)))?;
        let measured: Vec<SlideMeasurement> = serde_wasm_bindgen::from_value(measurements)
            .map_err(|e| JsError::new(&format!("Invalid measurements: {}", e)))?;
        let probe: HashMap<usize, Measurement> = measured
            .into_iter()
            .map(|m| {
                (
                    m.slide,
                    Measurement {
                        box_height: m.box_height,
                        content_height: m.content_height,
                    },
                )
            })
            .collect();

        let updates: Vec<ScaleResult> = self
            .inner
            .on_layout_change(&batch, &probe)
            .into_iter()
            .map(|update| ScaleResult {
                slide: update.slide,
                transform: update.transform.css(),
            })
            .collect();
        to_js(&updates)
    }

    /// `"closed"`, `"initializing"` or `"ready"`.
    pub fn state(&self) -> String {
        match self.inner.state() {
            PresenterState::Closed => "closed",
            PresenterState::Initializing => "initializing",
            PresenterState::Ready => "ready",
        }
        .to_string()
    }

    /// Theme in effect.
    pub fn theme(&self) -> String {
        self.inner.config().theme.as_str().to_string()
    }
}
