// Formatting State Publisher
// Derives the toolbar snapshot and hands it over one event-loop tick later.

use super::structured_document::{CharStyle, ListKind, StructuredDocument, TextColor, TextRange};

/// Formatting at the cursor, as shown by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormattingSnapshot {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub bullet: bool,
    pub checkbox: bool,
}

/// Receives snapshots. The toolbar never gets a reference into the document.
pub trait ToolbarSink {
    fn formatting_state_changed(&mut self, snapshot: FormattingSnapshot);
}

impl<F> ToolbarSink for F
where
    F: FnMut(FormattingSnapshot),
{
    fn formatting_state_changed(&mut self, snapshot: FormattingSnapshot) {
        self(snapshot)
    }
}

/// Drop an accent color inherited from a glyph cell. Accent only belongs on
/// checklist glyphs, never on typed text.
pub fn guard_inherited_accent(style: CharStyle) -> CharStyle {
    if style.color == TextColor::Accent {
        tracing::trace!("inherited accent color reset to default");
        return style.with_color(TextColor::Default);
    }
    style
}

/// Compute the snapshot for `selection`. A non-empty selection reports the
/// style of its first char; a caret reports the pending typing style.
pub fn compute_snapshot(
    doc: &StructuredDocument,
    selection: TextRange,
    pending: CharStyle,
) -> FormattingSnapshot {
    let selection = doc.clamp_range(selection);
    let start = doc.offset_to_position(selection.start);

    // `start` may sit on a separator; the first selected char then opens
    // the next paragraph, which also decides the list state
    let at = if selection.is_empty() {
        start
    } else {
        let first = doc.offset_to_position(selection.start + 1);
        if first.paragraph != start.paragraph {
            first
        } else {
            start
        }
    };
    let paragraph = doc.paragraph(at.paragraph);

    let style = if selection.is_empty() {
        pending
    } else {
        paragraph
            .and_then(|p| p.style_at(at.offset))
            .unwrap_or(pending)
    };
    let list = paragraph.map(|p| p.list()).unwrap_or_default();

    FormattingSnapshot {
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        bullet: list == ListKind::Bullet,
        checkbox: list.is_checkbox(),
    }
}

/// Single-slot, last-write-wins delivery of snapshots.
///
/// Edits call `schedule` while the document may still be mid-change; the
/// host calls `flush` from its next event-loop tick, when the document has
/// settled. A newer snapshot replaces an undelivered one, and a snapshot
/// equal to the last delivered one is dropped.
#[derive(Debug, Default)]
pub struct FormattingPublisher {
    pending: Option<FormattingSnapshot>,
    delivered: Option<FormattingSnapshot>,
}

impl FormattingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, snapshot: FormattingSnapshot) {
        self.pending = Some(snapshot);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deliver the pending snapshot, if any. Returns true if the sink was
    /// called.
    pub fn flush(&mut self, sink: &mut dyn ToolbarSink) -> bool {
        let Some(snapshot) = self.pending.take() else {
            return false;
        };
        if self.delivered == Some(snapshot) {
            return false;
        }
        self.delivered = Some(snapshot);
        sink.formatting_state_changed(snapshot);
        true
    }
}
