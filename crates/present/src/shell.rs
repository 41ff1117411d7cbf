//! Presentation lifecycle.
//!
//! A [`Presenter`] drives one host through `Closed -> Initializing -> Ready
//! -> Closed` cycles. Everything acquired during an open (event
//! subscriptions, injected style sheets, the slideshow engine, collapsible
//! state) is released by [`Presenter::close`], which also runs on drop.

use crate::collapsible::{CollapsibleState, ItemId, ToggleOutcome};
use crate::config::{EngineConfig, PresentConfig, Viewport};
use crate::keys::{KeyAction, KeyEvent, classify_key};
use crate::render::{RenderedDeck, compile_deck};
use crate::scale::{AutoFitScaler, ClassMutation, LayoutProbe, ScaleUpdate};
use crate::styles::{PRINT_STYLE_ID, StyleRegistry, StyleSheet, print_stylesheet};
use bulletdeck_core::{DeckError, Outline, RefResolver};
use std::borrow::Cow;
use std::collections::HashMap;

/// Host events the presenter listens to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Keydown on the document.
    KeyDown,
    /// Class changes inside the deck (slide activation).
    LayoutChange,
    /// Native print dialog finished.
    AfterPrint,
}

/// Handle returned by [`PresentationHost::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Page-side operations the presenter needs.
pub trait PresentationHost {
    /// Fresh outline snapshot; called on every open.
    fn fetch_outline(&mut self) -> Result<Outline, DeckError>;

    /// Expands cross-references in node text.
    fn resolve_refs<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    /// Size of the area the overlay covers.
    fn viewport(&self) -> Viewport;

    /// Mounts the deck HTML in the overlay container and shows it.
    fn show_overlay(&mut self, html: &str);

    /// Removes the overlay.
    fn hide_overlay(&mut self);

    /// Injects a style element.
    fn attach_style(&mut self, sheet: &StyleSheet);

    /// Removes a previously injected style element.
    fn detach_style(&mut self, id: &str);

    /// Starts delivering an event kind.
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;

    /// Stops a subscription. Must take effect before returning.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Builds a new slideshow engine over the mounted deck.
    fn init_engine(&mut self, config: &EngineConfig);

    /// Tears the slideshow engine down.
    fn destroy_engine(&mut self);

    /// Opens the native print dialog.
    fn print(&mut self);
}

struct HostRefs<'a, H: ?Sized>(&'a H);

impl<H: PresentationHost + ?Sized> RefResolver for HostRefs<'_, H> {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.0.resolve_refs(text)
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    /// No overlay, nothing held.
    Closed,
    /// Deck mounted, engine being built.
    Initializing,
    /// Engine running, listeners attached.
    Ready,
}

/// Result of a keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a presenter shortcut, or the presenter is not ready.
    Ignored,
    /// The presentation was closed.
    Closed,
    /// Print was started.
    Print,
}

struct Session {
    deck: RenderedDeck,
    collapsibles: HashMap<usize, CollapsibleState>,
    scaler: AutoFitScaler,
    keydown: SubscriptionId,
    layout: SubscriptionId,
    after_print: Option<SubscriptionId>,
}

/// Presentation shell over a host.
pub struct Presenter<H: PresentationHost> {
    host: H,
    config: PresentConfig,
    styles: StyleRegistry,
    state: PresenterState,
    session: Option<Session>,
}

impl<H: PresentationHost> Presenter<H> {
    /// Creates a closed presenter. The print sheet is registered if the
    /// registry does not carry one.
    pub fn new(host: H, config: PresentConfig, mut styles: StyleRegistry) -> Self {
        if styles.get(PRINT_STYLE_ID).is_none() {
            styles.register(print_stylesheet());
        }
        Self {
            host,
            config,
            styles,
            state: PresenterState::Closed,
            session: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PresenterState {
        self.state
    }

    /// Configuration in effect.
    pub fn config(&self) -> &PresentConfig {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Style registry.
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Deck rendered by the current open, if any.
    pub fn deck(&self) -> Option<&RenderedDeck> {
        self.session.as_ref().map(|session| &session.deck)
    }

    /// Collapsible state of a slide in the current open.
    pub fn collapsible(&self, slide: usize) -> Option<&CollapsibleState> {
        self.session
            .as_ref()
            .and_then(|session| session.collapsibles.get(&slide))
    }

    /// Opens the presentation. Returns `Ok(false)` when it already is open.
    ///
    /// Fetching and rendering happen before anything is acquired, so an
    /// error leaves the presenter closed with nothing to clean up.
    pub fn open(&mut self) -> Result<bool, DeckError> {
        if self.session.is_some() {
            log::debug!("Presentation already open, ignoring open");
            return Ok(false);
        }

        let outline = self.host.fetch_outline()?;
        let deck = compile_deck(&outline, &self.config, &HostRefs(&self.host))?;
        let collapsibles = deck
            .slides
            .iter()
            .filter_map(|slide| {
                let tree = slide.collapsible.clone()?;
                let mut state = CollapsibleState::new(tree);
                state.materialize();
                Some((slide.index, state))
            })
            .collect();

        self.host.show_overlay(&deck.html);
        for id in self.styles.theme_sheet_ids(self.config.theme) {
            if let Some(sheet) = self.styles.attach(&id) {
                log::debug!("Attaching style sheet {}", sheet.id);
                self.host.attach_style(sheet);
            }
        }

        self.state = PresenterState::Initializing;
        let engine = EngineConfig::for_viewport(self.host.viewport(), self.config.show_notes);
        log::debug!("Initializing slideshow engine ({} slides)", deck.slides.len());
        self.host.init_engine(&engine);

        let keydown = self.host.subscribe(EventKind::KeyDown);
        let layout = self.host.subscribe(EventKind::LayoutChange);
        self.session = Some(Session {
            deck,
            collapsibles,
            scaler: AutoFitScaler::new(),
            keydown,
            layout,
            after_print: None,
        });
        self.state = PresenterState::Ready;
        log::debug!("Presentation open");
        Ok(true)
    }

    /// Closes the presentation and releases everything the open acquired.
    /// Returns `false` when it was already closed.
    pub fn close(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        if let Some(id) = session.after_print {
            self.host.unsubscribe(id);
        }
        if self.styles.detach(PRINT_STYLE_ID) {
            self.host.detach_style(PRINT_STYLE_ID);
        }
        self.host.unsubscribe(session.layout);
        self.host.unsubscribe(session.keydown);
        self.host.destroy_engine();
        for id in self.styles.release_all() {
            log::debug!("Detaching style sheet {}", id);
            self.host.detach_style(&id);
        }
        self.host.hide_overlay();

        self.state = PresenterState::Closed;
        log::debug!("Presentation closed");
        true
    }

    /// Handles a keydown delivered through the `KeyDown` subscription.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if self.state != PresenterState::Ready {
            return KeyOutcome::Ignored;
        }
        match classify_key(event, self.config.platform) {
            KeyAction::Close => {
                self.close();
                KeyOutcome::Closed
            }
            KeyAction::Print => {
                self.start_print();
                KeyOutcome::Print
            }
            KeyAction::Ignore => KeyOutcome::Ignored,
        }
    }

    fn start_print(&mut self) {
        if let Some(sheet) = self.styles.attach(PRINT_STYLE_ID) {
            self.host.attach_style(sheet);
        }
        if let Some(session) = self.session.as_mut()
            && session.after_print.is_none()
        {
            session.after_print = Some(self.host.subscribe(EventKind::AfterPrint));
        }
        self.host.print();
    }

    /// Handles the one-shot print-completion event: removes the print sheet
    /// and the subscription. Returns `false` when no print was pending.
    pub fn after_print(&mut self) -> bool {
        let Some(id) = self
            .session
            .as_mut()
            .and_then(|session| session.after_print.take())
        else {
            return false;
        };
        self.host.unsubscribe(id);
        if self.styles.detach(PRINT_STYLE_ID) {
            self.host.detach_style(PRINT_STYLE_ID);
        }
        true
    }

    /// Flips a list item on a collapsible slide.
    ///
    /// `Ok(None)` when closed, when the slide is not collapsible, or when the
    /// item has no nested list.
    pub fn toggle(&mut self, slide: usize, item: ItemId) -> Result<Option<ToggleOutcome>, DeckError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        if slide >= session.deck.slides.len() {
            return Err(DeckError::invalid_slide(
                slide,
                format!("deck has {} slides", session.deck.slides.len()),
            ));
        }
        Ok(session
            .collapsibles
            .get_mut(&slide)
            .and_then(|state| state.toggle(item)))
    }

    /// Handles one batch of class mutations from the `LayoutChange` subscription.
    pub fn on_layout_change<P: LayoutProbe + ?Sized>(
        &mut self,
        batch: &[ClassMutation],
        probe: &P,
    ) -> Vec<ScaleUpdate> {
        if self.state != PresenterState::Ready {
            return Vec::new();
        }
        match self.session.as_mut() {
            Some(session) => session.scaler.on_mutations(batch, probe),
            None => Vec::new(),
        }
    }
}

impl<H: PresentationHost> Drop for Presenter<H> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapsible::Caret;
    use crate::config::{Platform, PresentOptions, Theme};
    use crate::scale::{Measurement, Transform};
    use bulletdeck_core::OutlineNode;
    use once_cell::sync::Lazy;
    use std::collections::HashSet;

    static OUTLINE: Lazy<Outline> = Lazy::new(|| {
        Outline::new(vec![
            OutlineNode::new("Intro"),
            OutlineNode::new("Plan {collapsible}").with_children(vec![
                OutlineNode::new("A").with_children(vec![
                    OutlineNode::new("A1").with_children(vec![OutlineNode::new("A1a")]),
                ]),
                OutlineNode::new("B").with_children(vec![OutlineNode::new("B1")]),
            ]),
        ])
    });

    #[derive(Default)]
    struct FakeHost {
        outline: Option<Outline>,
        next_id: u64,
        subscriptions: HashMap<SubscriptionId, EventKind>,
        styles: HashSet<String>,
        overlay: Option<String>,
        engines: usize,
        engine_live: bool,
        prints: usize,
        log: Vec<String>,
    }

    impl FakeHost {
        fn with_outline(outline: Outline) -> Self {
            Self {
                outline: Some(outline),
                ..Self::default()
            }
        }

        fn count(&self, kind: EventKind) -> usize {
            self.subscriptions.values().filter(|k| **k == kind).count()
        }
    }

    impl PresentationHost for FakeHost {
        fn fetch_outline(&mut self) -> Result<Outline, DeckError> {
            self.outline.clone().ok_or_else(|| DeckError::OutlineParse {
                format: "json",
                message: "no outline".to_string(),
            })
        }

        fn resolve_refs<'a>(&self, text: &'a str) -> Cow<'a, str> {
            Cow::Owned(text.replace("((ref))", "resolved"))
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: 1000.0,
                height: 500.0,
            }
        }

        fn show_overlay(&mut self, html: &str) {
            self.overlay = Some(html.to_string());
        }

        fn hide_overlay(&mut self) {
            self.overlay = None;
        }

        fn attach_style(&mut self, sheet: &StyleSheet) {
            assert!(self.styles.insert(sheet.id.clone()), "duplicate {}", sheet.id);
        }

        fn detach_style(&mut self, id: &str) {
            self.styles.remove(id);
        }

        fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
            self.next_id += 1;
            let id = SubscriptionId(self.next_id);
            self.subscriptions.insert(id, kind);
            id
        }

        fn unsubscribe(&mut self, id: SubscriptionId) {
            self.subscriptions.remove(&id);
        }

        fn init_engine(&mut self, config: &EngineConfig) {
            assert!(!self.engine_live);
            self.log.push(format!("init {}x{}", config.width, config.height));
            self.engines += 1;
            self.engine_live = true;
        }

        fn destroy_engine(&mut self) {
            self.engine_live = false;
        }

        fn print(&mut self) {
            self.prints += 1;
        }
    }

    fn registry() -> StyleRegistry {
        StyleRegistry::with_sheets([
            StyleSheet::new("vendor/reveal.css", ".reveal {}"),
            StyleSheet::new("theme/black.css", "body {}"),
            StyleSheet::new("theme/white.css", "body {}"),
        ])
    }

    fn presenter() -> Presenter<FakeHost> {
        Presenter::new(
            FakeHost::with_outline(OUTLINE.clone()),
            PresentConfig::default(),
            registry(),
        )
    }

    fn ctrl_p() -> KeyEvent {
        KeyEvent {
            ctrl: true,
            ..KeyEvent::plain("p")
        }
    }

    #[test]
    fn open_reaches_ready_with_listeners() {
        let mut presenter = presenter();
        assert_eq!(presenter.state(), PresenterState::Closed);
        assert!(presenter.open().unwrap());
        assert_eq!(presenter.state(), PresenterState::Ready);

        let host = presenter.host();
        assert_eq!(host.count(EventKind::KeyDown), 1);
        assert_eq!(host.count(EventKind::LayoutChange), 1);
        assert!(host.overlay.as_ref().unwrap().contains("<h1>Intro</h1>"));
        assert_eq!(host.log, vec!["init 900x450".to_string()]);
        assert!(host.styles.contains("theme/black.css"));
        assert!(host.styles.contains("vendor/reveal.css"));
        assert!(!host.styles.contains("theme/white.css"));
    }

    #[test]
    fn second_open_is_ignored() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        assert!(!presenter.open().unwrap());
        assert_eq!(presenter.host().engines, 1);
        assert_eq!(presenter.host().count(EventKind::KeyDown), 1);
    }

    #[test]
    fn close_releases_everything() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        presenter.handle_key(&ctrl_p());
        assert!(presenter.close());

        let host = presenter.host();
        assert!(host.subscriptions.is_empty());
        assert!(host.styles.is_empty());
        assert!(host.overlay.is_none());
        assert!(!host.engine_live);
        assert_eq!(presenter.styles().attached_count(), 0);
        assert!(presenter.deck().is_none());
        assert!(!presenter.close());
    }

    #[test]
    fn escape_closes() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        assert_eq!(presenter.handle_key(&KeyEvent::plain("Escape")), KeyOutcome::Closed);
        assert_eq!(presenter.state(), PresenterState::Closed);
        assert_eq!(presenter.handle_key(&KeyEvent::plain("Escape")), KeyOutcome::Ignored);
    }

    #[test]
    fn print_is_one_shot() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        assert_eq!(presenter.handle_key(&ctrl_p()), KeyOutcome::Print);
        assert_eq!(presenter.handle_key(&ctrl_p()), KeyOutcome::Print);
        assert_eq!(presenter.host().prints, 2);
        assert_eq!(presenter.host().count(EventKind::AfterPrint), 1);
        assert!(presenter.host().styles.contains(PRINT_STYLE_ID));

        assert!(presenter.after_print());
        assert!(!presenter.after_print());
        assert_eq!(presenter.host().count(EventKind::AfterPrint), 0);
        assert!(!presenter.host().styles.contains(PRINT_STYLE_ID));
        assert!(presenter.host().styles.contains("theme/black.css"));
    }

    #[test]
    fn print_uses_meta_on_mac() {
        let config = PresentConfig::from_options(&PresentOptions::default(), Platform::Mac);
        let mut presenter = Presenter::new(FakeHost::with_outline(OUTLINE.clone()), config, registry());
        presenter.open().unwrap();
        assert_eq!(presenter.handle_key(&ctrl_p()), KeyOutcome::Ignored);
        let cmd_p = KeyEvent {
            meta: true,
            ..KeyEvent::plain("p")
        };
        assert_eq!(presenter.handle_key(&cmd_p), KeyOutcome::Print);
    }

    #[test]
    fn toggle_walks_collapsible_state() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        assert_eq!(presenter.collapsible(1).unwrap().displayed(), vec![ItemId(0), ItemId(3)]);

        let outcome = presenter.toggle(1, ItemId(0)).unwrap().unwrap();
        assert_eq!(outcome.caret, Caret::Down);
        assert_eq!(outcome.changed, vec![(ItemId(1), true)]);
        assert!(!presenter.collapsible(1).unwrap().is_displayed(ItemId(2)));
        assert!(!presenter.collapsible(1).unwrap().is_displayed(ItemId(4)));

        assert!(presenter.toggle(0, ItemId(0)).unwrap().is_none());
        assert!(matches!(
            presenter.toggle(9, ItemId(0)),
            Err(DeckError::InvalidSlide { index: 9, .. })
        ));
    }

    #[test]
    fn reopen_starts_fresh() {
        let mut presenter = presenter();
        presenter.open().unwrap();
        presenter.toggle(1, ItemId(0)).unwrap();
        presenter.close();
        assert!(presenter.toggle(1, ItemId(0)).unwrap().is_none());

        presenter.open().unwrap();
        assert_eq!(presenter.host().engines, 2);
        assert_eq!(presenter.host().subscriptions.len(), 2);
        let state = presenter.collapsible(1).unwrap();
        assert_eq!(state.caret(ItemId(0)), Some(Caret::Right));
        assert_eq!(state.displayed(), vec![ItemId(0), ItemId(3)]);
        assert_eq!(presenter.config().theme, Theme::Black);
    }

    #[test]
    fn layout_changes_rescale_only_while_ready() {
        let mut probe = HashMap::new();
        probe.insert(
            1,
            Measurement {
                box_height: 400.0,
                content_height: 800.0,
            },
        );
        let batch = vec![ClassMutation {
            slide: 1,
            class_name: "present".to_string(),
        }];

        let mut presenter = presenter();
        assert!(presenter.on_layout_change(&batch, &probe).is_empty());
        presenter.open().unwrap();
        let updates = presenter.on_layout_change(&batch, &probe);
        assert_eq!(updates[0].transform, Transform::Scale { factor: 0.5 });
        assert!(presenter.on_layout_change(&batch, &probe).is_empty());
    }

    #[test]
    fn failed_fetch_leaves_nothing_behind() {
        let mut presenter = Presenter::new(FakeHost::default(), PresentConfig::default(), registry());
        assert!(presenter.open().is_err());
        assert_eq!(presenter.state(), PresenterState::Closed);
        assert!(presenter.host().subscriptions.is_empty());
        assert!(presenter.host().overlay.is_none());
    }

    #[test]
    fn host_resolves_references() {
        let outline = Outline::new(vec![
            OutlineNode::new("See ((ref))").with_children(vec![OutlineNode::new("also ((ref))")]),
        ]);
        let mut presenter = Presenter::new(FakeHost::with_outline(outline), PresentConfig::default(), registry());
        presenter.open().unwrap();
        let html = &presenter.deck().unwrap().html;
        assert!(html.contains("<li>also resolved</li>"));
    }
}
