//! Keyboard shortcuts while the presentation is open.

use crate::config::Platform;
use serde::Deserialize;

/// A keydown as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// `KeyboardEvent.key`.
    pub key: String,
    /// Ctrl held.
    #[serde(default, alias = "ctrlKey")]
    pub ctrl: bool,
    /// Meta (Cmd) held.
    #[serde(default, alias = "metaKey")]
    pub meta: bool,
    /// Shift held.
    #[serde(default, alias = "shiftKey")]
    pub shift: bool,
    /// Alt held.
    #[serde(default, alias = "altKey")]
    pub alt: bool,
}

impl KeyEvent {
    /// A key without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Whether the platform's control modifier is held (Cmd on Apple, Ctrl elsewhere).
    pub fn is_control(&self, platform: Platform) -> bool {
        if platform.uses_meta_for_control() {
            self.meta
        } else {
            self.ctrl
        }
    }
}

/// What a key should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Escape: close the presentation.
    Close,
    /// Control+P: print only the deck.
    Print,
    /// Anything else.
    Ignore,
}

/// Maps a keydown to an action.
pub fn classify_key(event: &KeyEvent, platform: Platform) -> KeyAction {
    if event.key == "Escape" {
        KeyAction::Close
    } else if event.is_control(platform) && event.key == "p" && !event.shift && !event.alt {
        KeyAction::Print
    } else {
        KeyAction::Ignore
    }
}
