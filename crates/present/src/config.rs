//! Presentation options, themes, and slideshow engine settings.

use serde::{Deserialize, Serialize};

/// Raw options as the host passes them (all strings, all optional).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresentOptions {
    /// Requested theme name.
    #[serde(default)]
    pub theme: Option<String>,
    /// `"true"` enables speaker notes; anything else disables them.
    #[serde(default, alias = "showNotes")]
    pub notes: Option<String>,
}

/// Browser family, as far as the presentation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS browsers other than Safari.
    Mac,
    /// Safari; only a subset of themes render correctly.
    Safari,
    /// Everything else.
    #[default]
    Other,
}

impl Platform {
    /// Whether the Meta key plays the role of Ctrl for shortcuts.
    pub fn uses_meta_for_control(self) -> bool {
        matches!(self, Platform::Mac | Platform::Safari)
    }
}

/// Slide theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background, white text.
    #[default]
    Black,
    /// White background, black text.
    White,
    /// Beige background.
    Beige,
    /// Gray background.
    League,
    /// Blue sky background.
    Sky,
    /// Black background, thick text.
    Night,
    /// Cappuccino background, serif fonts.
    Serif,
    /// White background, plain.
    Simple,
    /// Cream-colored background.
    Solarized,
    /// Dark with red accents.
    Blood,
    /// Dark blue background.
    Moon,
}

impl Theme {
    /// Themes that render correctly in Safari.
    pub const SAFARI: [Theme; 3] = [Theme::Black, Theme::White, Theme::Beige];

    /// Every supported theme.
    pub const ALL: [Theme; 11] = [
        Theme::Black,
        Theme::White,
        Theme::Beige,
        Theme::League,
        Theme::Sky,
        Theme::Night,
        Theme::Serif,
        Theme::Simple,
        Theme::Solarized,
        Theme::Blood,
        Theme::Moon,
    ];

    /// Lowercase theme name.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Black => "black",
            Theme::White => "white",
            Theme::Beige => "beige",
            Theme::League => "league",
            Theme::Sky => "sky",
            Theme::Night => "night",
            Theme::Serif => "serif",
            Theme::Simple => "simple",
            Theme::Solarized => "solarized",
            Theme::Blood => "blood",
            Theme::Moon => "moon",
        }
    }

    /// Themes allowed on a platform.
    pub fn allowed(platform: Platform) -> &'static [Theme] {
        match platform {
            Platform::Safari => &Self::SAFARI,
            _ => &Self::ALL,
        }
    }

    /// Picks the requested theme if the platform allows it, else the default.
    pub fn normalize(requested: Option<&str>, platform: Platform) -> Self {
        requested
            .and_then(|name| {
                Self::allowed(platform)
                    .iter()
                    .copied()
                    .find(|theme| theme.as_str() == name)
            })
            .unwrap_or_default()
    }

    /// Suffix of the stylesheet ids belonging to this theme.
    pub fn stylesheet_suffix(self) -> String {
        format!("{}.css", self.as_str())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized configuration, fixed for the lifetime of a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentConfig {
    /// Theme in effect.
    pub theme: Theme,
    /// Speaker-notes extraction mode.
    pub show_notes: bool,
    /// Platform used for shortcuts and theme filtering.
    pub platform: Platform,
}

impl PresentConfig {
    /// Normalizes raw host options.
    pub fn from_options(options: &PresentOptions, platform: Platform) -> Self {
        let theme = Theme::normalize(options.theme.as_deref(), platform);
        if let Some(requested) = options.theme.as_deref()
            && requested != theme.as_str()
        {
            log::debug!("Theme '{}' unavailable on {:?}, using '{}'", requested, platform, theme);
        }
        Self {
            theme,
            show_notes: options.notes.as_deref() == Some("true"),
            platform,
        }
    }
}

impl Default for PresentConfig {
    fn default() -> Self {
        Self::from_options(&PresentOptions::default(), Platform::default())
    }
}

/// Size of the area the overlay covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

/// Settings handed to the slideshow engine on every open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Engine runs inside the overlay rather than owning the page.
    pub embedded: bool,
    /// Slide number format (`current/total`).
    pub slide_number: &'static str,
    /// Deck width.
    pub width: f64,
    /// Deck height.
    pub height: f64,
    /// Whether the engine shows the notes panel.
    pub show_notes: bool,
}

impl EngineConfig {
    /// Fraction of the viewport the deck occupies.
    pub const VIEWPORT_FRACTION: f64 = 0.9;

    /// Engine settings for a viewport.
    pub fn for_viewport(viewport: Viewport, show_notes: bool) -> Self {
        Self {
            embedded: true,
            slide_number: "c/t",
            width: viewport.width * Self::VIEWPORT_FRACTION,
            height: viewport.height * Self::VIEWPORT_FRACTION,
            show_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_theme_defaults_to_black() {
        assert_eq!(Theme::normalize(None, Platform::Other), Theme::Black);
    }

    #[test]
    fn known_theme_is_kept() {
        assert_eq!(Theme::normalize(Some("moon"), Platform::Other), Theme::Moon);
    }

    #[test]
    fn safari_restricts_palette() {
        assert_eq!(Theme::normalize(Some("moon"), Platform::Safari), Theme::Black);
        assert_eq!(Theme::normalize(Some("beige"), Platform::Safari), Theme::Beige);
    }

    #[test]
    fn theme_names_are_case_sensitive() {
        assert_eq!(Theme::normalize(Some("Moon"), Platform::Other), Theme::Black);
    }

    #[test]
    fn notes_flag_is_string_typed() {
        let on = PresentOptions {
            notes: Some("true".to_string()),
            ..Default::default()
        };
        let off = PresentOptions {
            notes: Some("yes".to_string()),
            ..Default::default()
        };
        assert!(PresentConfig::from_options(&on, Platform::Other).show_notes);
        assert!(!PresentConfig::from_options(&off, Platform::Other).show_notes);
    }

    #[test]
    fn options_deserialize_from_json() {
        let options: PresentOptions =
            serde_json::from_str(r#"{"theme": "sky", "notes": "true"}"#).unwrap();
        let config = PresentConfig::from_options(&options, Platform::Mac);
        assert_eq!(config.theme, Theme::Sky);
        assert!(config.show_notes);
    }

    #[test]
    fn engine_uses_ninety_percent_of_viewport() {
        let engine = EngineConfig::for_viewport(
            Viewport {
                width: 1000.0,
                height: 500.0,
            },
            false,
        );
        assert_eq!(engine.width, 900.0);
        assert_eq!(engine.height, 450.0);
        assert_eq!(engine.slide_number, "c/t");
        let json = serde_json::to_value(&engine).unwrap();
        assert_eq!(json["slideNumber"], "c/t");
        assert_eq!(json["showNotes"], false);
    }
}
