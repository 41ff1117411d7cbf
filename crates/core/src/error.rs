use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while compiling an outline into a deck.
///
/// Directive and image fallbacks never end up here; those are recorded as
/// [`DeckWarning`]s and rendering carries on.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Outline snapshot could not be deserialized.
    #[error("Outline parse error ({format}): {message}")]
    OutlineParse {
        /// Input format ("json" or "yaml")
        format: &'static str,
        /// Error message
        message: String,
    },
    /// markdown-rs rejected the rendered bullet markup.
    #[error("Markdown error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location inside the bullet markup
        location: SourceLocation,
    },
    /// HTML rewrite pass failed.
    #[error("Rewrite error: {0}")]
    Rewrite(String),
    /// A slide index that does not exist in the current deck.
    #[error("Invalid slide {index}: {message}")]
    InvalidSlide {
        /// Zero-based slide index
        index: usize,
        /// Error message
        message: String,
    },
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DeckError {
    /// Create a markdown error with location
    pub fn markdown(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Markdown {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Create an invalid slide error
    pub fn invalid_slide(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidSlide {
            index,
            message: message.into(),
        }
    }
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckWarning {
    /// `{layout:` opened but never closed; left in the text as-is.
    UnclosedDirective {
        /// Zero-based slide index
        slide: usize,
        /// Surrounding context for the message
        context: String,
    },
    /// `{layout:}` with a blank value; the default layout was used.
    EmptyLayout {
        /// Zero-based slide index
        slide: usize,
    },
    /// Image layout requested but the first child is not an image reference.
    ImageLayoutWithoutImage {
        /// Zero-based slide index
        slide: usize,
        /// Text of the first child
        text: String,
    },
    /// Title text mentions an image marker but did not parse as one.
    UnparsedImage {
        /// Zero-based slide index
        slide: usize,
        /// Title text
        text: String,
    },
}

impl DeckWarning {
    /// Index of the slide this warning belongs to.
    pub fn slide(&self) -> usize {
        match self {
            DeckWarning::UnclosedDirective { slide, .. } => *slide,
            DeckWarning::EmptyLayout { slide } => *slide,
            DeckWarning::ImageLayoutWithoutImage { slide, .. } => *slide,
            DeckWarning::UnparsedImage { slide, .. } => *slide,
        }
    }
}

impl std::fmt::Display for DeckWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckWarning::UnclosedDirective { slide, context } => {
                write!(f, "slide {}: unclosed directive near '{}'", slide, context)
            }
            DeckWarning::EmptyLayout { slide } => {
                write!(f, "slide {}: empty layout directive, using default", slide)
            }
            DeckWarning::ImageLayoutWithoutImage { slide, text } => {
                write!(
                    f,
                    "slide {}: image layout but first child is not an image: '{}'",
                    slide, text
                )
            }
            DeckWarning::UnparsedImage { slide, text } => {
                write!(f, "slide {}: could not parse image reference '{}'", slide, text)
            }
        }
    }
}

/// Collection of non-fatal diagnostics gathered while compiling a deck.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<DeckWarning>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: DeckWarning) {
        self.warnings.push(warning);
    }

    /// Append every warning from another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Warnings attached to one slide.
    pub fn for_slide(&self, slide: usize) -> impl Iterator<Item = &DeckWarning> {
        self.warnings.iter().filter(move |w| w.slide() == slide)
    }
}
