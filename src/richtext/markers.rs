// Marker recognition: typed tokens at the start of a paragraph that turn
// into list formatting ("- ", "[] ", "[x] " and the structural glyphs).

use super::structured_document::{ListKind, Paragraph};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<bullet>[-*•–—])|(?P<open>\[ ?\]|○)|(?P<done>\[[xX]\]|◉)) ").unwrap()
});

/// A recognized marker token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Char range of the token inside the paragraph text
    pub range: Range<usize>,
    pub kind: ListKind,
}

impl MarkerMatch {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Check whether the char just inserted at `char_index` completed a marker
/// token at the start of `paragraph`.
///
/// Only fires when the paragraph is not already a list and when the inserted
/// char is the space that terminates the token, so editing further along a
/// line that happens to start with "- " never converts it.
pub fn recognize(paragraph: &Paragraph, char_index: usize) -> Option<MarkerMatch> {
    if paragraph.list().is_list() {
        return None;
    }

    let caps = MARKER_PATTERN.captures(paragraph.text())?;
    let token = caps.get(0)?;
    let len = token.as_str().chars().count();
    if char_index + 1 != len {
        return None;
    }

    let kind = if caps.name("bullet").is_some() {
        ListKind::Bullet
    } else if caps.name("open").is_some() {
        ListKind::CheckboxUnchecked
    } else {
        ListKind::CheckboxChecked
    };

    tracing::trace!(?kind, len, "marker recognized");
    Some(MarkerMatch { range: 0..len, kind })
}
