//! `![alt](url)` image reference detection.

use serde::Serialize;

/// An image reference found inside a line of outline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef<'a> {
    /// Alt text between the brackets.
    pub alt: &'a str,
    /// Source between the parentheses.
    pub src: &'a str,
    /// Byte range of the whole reference inside the searched text.
    #[serde(skip)]
    pub span: std::ops::Range<usize>,
}

/// Finds the first image reference in `text`.
///
/// Matching is greedy within a single line: the alt text runs to the last
/// `](` that still has a closing `)` after it, and the source runs to the last
/// `)` on that line. References never span a newline.
///
/// ```
/// use bulletdeck_core::image::find_image;
///
/// let image = find_image("see ![chart](img/q3.png) here").unwrap();
/// assert_eq!(image.alt, "chart");
/// assert_eq!(image.src, "img/q3.png");
/// assert!(find_image("no image").is_none());
/// ```
pub fn find_image(text: &str) -> Option<ImageRef<'_>> {
    let mut search_from = 0usize;
    while let Some(offset) = text[search_from..].find("![") {
        let start = search_from + offset;
        let body_start = start + 2;
        let line_end = text[body_start..]
            .find('\n')
            .map(|pos| body_start + pos)
            .unwrap_or(text.len());
        let line = &text[body_start..line_end];

        if let Some(close) = line.rfind(')') {
            let close = body_start + close;
            if let Some(sep) = text[body_start..close].rfind("](") {
                let sep = body_start + sep;
                return Some(ImageRef {
                    alt: &text[body_start..sep],
                    src: &text[sep + 2..close],
                    span: start..close + 1,
                });
            }
        }
        search_from = body_start;
    }
    None
}

/// True when `text` contains an image reference anywhere.
pub fn has_image(text: &str) -> bool {
    find_image(text).is_some()
}

/// True when the text looks like an attempted image (`![`) that did not parse.
pub fn is_broken_image(text: &str) -> bool {
    text.contains("![") && !has_image(text)
}
