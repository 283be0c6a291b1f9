// List Formatting Engine
// Applies and removes paragraph-level list formatting.

use super::markers::MarkerMatch;
use super::structured_document::{
    CharStyle, ListKind, ListStyle, Paragraph, StructuredDocument, TextColor,
};
use std::ops::RangeInclusive;

/// Where a style lookup got its answer from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    /// A run already present in the paragraph
    Committed,
    /// The pending typing style (empty paragraph)
    Pending,
}

/// Character formatting in effect at `offset` of `paragraph`.
///
/// Reads the committed run before the offset (or the first run at offset 0).
/// An empty paragraph has no runs, so the pending typing style answers
/// instead.
pub fn resolve_base_style(
    paragraph: &Paragraph,
    offset: usize,
    pending: CharStyle,
) -> (CharStyle, StyleSource) {
    let len = paragraph.char_len();
    if len == 0 {
        return (pending, StyleSource::Pending);
    }
    let at = offset.saturating_sub(1).min(len - 1);
    match paragraph.style_at(at) {
        Some(style) => (style, StyleSource::Committed),
        None => (pending, StyleSource::Pending),
    }
}

/// Typing style to use after a list change: keeps bold, italic and underline,
/// resets the color to `Default`. `Default` resolves through
/// `Palette::text_rgba`, which never matches the background.
pub fn visible_typing_style(base: CharStyle) -> CharStyle {
    if base.color != TextColor::Default {
        tracing::trace!(color = ?base.color, "pending color forced to default");
    }
    base.with_color(TextColor::Default)
}

/// Turn a recognized marker into list formatting: the marker chars are
/// deleted and the paragraph becomes a list item at its current indent.
/// Returns the number of chars removed.
pub fn apply_list(doc: &mut StructuredDocument, paragraph: usize, marker: &MarkerMatch) -> usize {
    let Some(p) = doc.paragraph_mut(paragraph) else {
        return 0;
    };
    if p.list().is_list() {
        return 0;
    }
    p.delete_range(marker.range.start, marker.range.end);
    let indent = p.indent();
    p.set_list(marker.kind, indent);
    tracing::debug!(paragraph, kind = ?marker.kind, "list applied from marker");
    marker.len()
}

/// Drop list formatting from one paragraph (backspace in front of the text).
/// Returns false if it was not a list item.
pub fn remove_list(doc: &mut StructuredDocument, paragraph: usize) -> bool {
    match doc.paragraph_mut(paragraph) {
        Some(p) if p.list().is_list() => {
            p.set_list(ListKind::None, 0);
            true
        }
        _ => false,
    }
}

/// Toggle `style` on every paragraph in `paragraphs`, each deciding on its
/// own: a paragraph already in the family loses its list formatting, any
/// other paragraph switches to the family with its indent kept. Blank plain
/// paragraphs are skipped when several paragraphs are touched.
///
/// Returns the number of paragraphs changed.
pub fn toggle_list(
    doc: &mut StructuredDocument,
    paragraphs: RangeInclusive<usize>,
    style: ListStyle,
) -> usize {
    let multiple = paragraphs.start() != paragraphs.end();
    let mut changed = 0;

    for index in paragraphs {
        let Some(p) = doc.paragraph_mut(index) else {
            break;
        };
        if multiple && p.is_blank() && !p.list().is_list() {
            continue;
        }
        if p.list().style() == Some(style) {
            p.set_list(ListKind::None, 0);
        } else {
            let indent = p.indent();
            p.set_list(style.initial_kind(), indent);
        }
        changed += 1;
    }

    tracing::debug!(?style, changed, "list toggled");
    changed
}
