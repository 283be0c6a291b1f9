// Checkbox Interaction Handler

use super::structured_document::{ListKind, StructuredDocument, TextColor};

/// Rendered cells taken by a list marker: the glyph and one space
pub const MARKER_CELLS: usize = 2;

/// A pointer press resolved by the host to a rendered cell.
///
/// `column` counts cells on the paragraph's first line including the list
/// marker, so on a list paragraph column 0 is the glyph, column 1 the space
/// after it and column 2 the first text char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerHit {
    pub paragraph: usize,
    pub column: usize,
}

impl PointerHit {
    pub fn new(paragraph: usize, column: usize) -> Self {
        PointerHit { paragraph, column }
    }
}

/// The checkbox paragraph whose glyph cell (or the space after it) was hit
pub fn glyph_hit(doc: &StructuredDocument, hit: PointerHit) -> Option<usize> {
    let paragraph = doc.paragraph(hit.paragraph)?;
    if paragraph.list().is_checkbox() && hit.column < MARKER_CELLS {
        Some(hit.paragraph)
    } else {
        None
    }
}

/// Flip the check state of a checkbox paragraph. Returns the new kind, or
/// `None` when the paragraph is not a checkbox.
///
/// The glyph gets the accent color only while checked. The char following
/// the glyph is forced back to the default color over a one-char range, so
/// the accent never spreads into the item text.
pub fn toggle_checkbox(doc: &mut StructuredDocument, paragraph: usize) -> Option<ListKind> {
    let p = doc.paragraph_mut(paragraph)?;
    let next = match p.list() {
        ListKind::CheckboxUnchecked => ListKind::CheckboxChecked,
        ListKind::CheckboxChecked => ListKind::CheckboxUnchecked,
        _ => return None,
    };

    let indent = p.indent();
    p.set_list(next, indent);
    let glyph_color = if next == ListKind::CheckboxChecked {
        TextColor::Accent
    } else {
        TextColor::Default
    };
    p.set_marker_color(glyph_color);
    p.map_style_range(0, 1, |style| style.color = TextColor::Default);

    tracing::debug!(paragraph, kind = ?next, "checkbox toggled");
    Some(next)
}
