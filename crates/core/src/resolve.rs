//! Cross-reference resolution hook.

use std::borrow::Cow;

/// Expands outline cross-references (block refs, page links, ...) into display text.
///
/// The host supplies the real implementation; it is called once per rendered node.
pub trait RefResolver {
    /// Resolve references in `text`, returning an owned or borrowed string.
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

impl<F> RefResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned((self)(text))
    }
}

/// Resolver that leaves text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl RefResolver for IdentityResolver {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}
