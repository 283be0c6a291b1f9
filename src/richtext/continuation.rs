// Continuation & Indentation Controller
// Enter, Tab and Shift-Tab inside list paragraphs.

use super::structured_document::{DocumentPosition, ListKind, Paragraph, StructuredDocument};

/// What Enter did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Not a list paragraph; the host performs a plain line break
    NotList,
    /// The item was split and the list continues in `paragraph`
    Continued { paragraph: usize },
    /// An empty nested item moved up one level
    Outdented { indent: u8 },
    /// An empty top-level item ended the list; the cursor goes to `paragraph`
    Terminated { paragraph: usize },
}

impl EnterOutcome {
    pub fn handled(self) -> bool {
        self != EnterOutcome::NotList
    }
}

/// Kind of a paragraph that continues `kind` after Enter
fn continued_kind(kind: ListKind) -> ListKind {
    match kind {
        ListKind::CheckboxChecked => ListKind::CheckboxUnchecked,
        other => other,
    }
}

/// Handle Enter with the caret at `cursor`
pub fn handle_enter(doc: &mut StructuredDocument, cursor: DocumentPosition) -> EnterOutcome {
    let cursor = doc.clamp_position(cursor);
    let Some(current) = doc.paragraph(cursor.paragraph) else {
        return EnterOutcome::NotList;
    };
    let kind = current.list();
    let indent = current.indent();
    if !kind.is_list() {
        return EnterOutcome::NotList;
    }

    if !current.is_blank() {
        let index = doc.split_paragraph(cursor);
        if let Some(next) = doc.paragraph_mut(index) {
            next.set_list(continued_kind(kind), indent);
        }
        return EnterOutcome::Continued { paragraph: index };
    }

    if indent > 0 {
        if let Some(p) = doc.paragraph_mut(cursor.paragraph) {
            p.set_indent(indent - 1);
        }
        return EnterOutcome::Outdented { indent: indent - 1 };
    }

    if let Some(p) = doc.paragraph_mut(cursor.paragraph) {
        p.set_list(ListKind::None, 0);
    }
    let index = cursor.paragraph + 1;
    doc.insert_paragraph(index, Paragraph::new());
    EnterOutcome::Terminated { paragraph: index }
}

/// Handle Tab (or Shift-Tab when `shift`) on `paragraph`.
///
/// Returns the resulting indent, or `None` when the paragraph is not a list
/// item and the key should fall through to the host.
pub fn handle_tab(
    doc: &mut StructuredDocument,
    paragraph: usize,
    shift: bool,
    max_indent: u8,
) -> Option<u8> {
    let p = doc.paragraph_mut(paragraph)?;
    if !p.list().is_list() {
        return None;
    }
    // an item already past `max_indent` stays put on Tab
    let indent = if shift {
        p.indent().saturating_sub(1)
    } else if p.indent() < max_indent {
        p.indent() + 1
    } else {
        p.indent()
    };
    p.set_indent(indent);
    Some(indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::structured_document::{CharStyle, TextColor};

    #[test]
    fn test_enter_continues_bullet() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("abc").with_list(ListKind::Bullet, 1),
        ]);
        let outcome = handle_enter(&mut doc, DocumentPosition::new(0, 3));
        assert_eq!(outcome, EnterOutcome::Continued { paragraph: 1 });
        assert_eq!(doc.paragraph_count(), 2);
        for p in doc.paragraphs() {
            assert_eq!(p.list(), ListKind::Bullet);
            assert_eq!(p.indent(), 1);
        }
        assert_eq!(doc.paragraphs()[1].text(), "");
    }

    #[test]
    fn test_enter_mid_item_moves_tail() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("ab")
                .with_text("cd", CharStyle::bold())
                .with_list(ListKind::Bullet, 0),
        ]);
        handle_enter(&mut doc, DocumentPosition::new(0, 3));
        assert_eq!(doc.paragraphs()[0].text(), "abc");
        assert_eq!(doc.paragraphs()[1].text(), "d");
        assert_eq!(doc.paragraphs()[1].style_at(0), Some(CharStyle::bold()));
    }

    #[test]
    fn test_checked_item_continues_unchecked() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("done").with_list(ListKind::CheckboxChecked, 0),
        ]);
        handle_enter(&mut doc, DocumentPosition::new(0, 4));
        let next = &doc.paragraphs()[1];
        assert_eq!(next.list(), ListKind::CheckboxUnchecked);
        assert_eq!(next.marker_color(), TextColor::Default);
        assert_eq!(doc.paragraphs()[0].marker_color(), TextColor::Accent);
    }

    #[test]
    fn test_enter_on_empty_top_level_item_terminates() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("a").with_list(ListKind::Bullet, 0),
            Paragraph::new().with_list(ListKind::Bullet, 0),
        ]);
        let outcome = handle_enter(&mut doc, DocumentPosition::new(1, 0));
        assert_eq!(outcome, EnterOutcome::Terminated { paragraph: 2 });
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.paragraphs()[1].list(), ListKind::None);
        assert_eq!(doc.paragraphs()[2].list(), ListKind::None);
    }

    #[test]
    fn test_enter_on_whitespace_only_item_counts_as_empty() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("  ").with_list(ListKind::CheckboxUnchecked, 2),
        ]);
        let outcome = handle_enter(&mut doc, DocumentPosition::new(0, 2));
        assert_eq!(outcome, EnterOutcome::Outdented { indent: 1 });
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.paragraphs()[0].list(), ListKind::CheckboxUnchecked);
    }

    #[test]
    fn test_enter_outside_list_is_not_handled() {
        let mut doc = StructuredDocument::with_paragraph("plain");
        let before = doc.clone();
        assert!(!handle_enter(&mut doc, DocumentPosition::new(0, 5)).handled());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_tab_and_shift_tab() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("x").with_list(ListKind::Bullet, 0),
        ]);
        assert_eq!(handle_tab(&mut doc, 0, true, 8), Some(0));
        assert_eq!(handle_tab(&mut doc, 0, false, 8), Some(1));
        assert_eq!(handle_tab(&mut doc, 0, false, 1), Some(1));
        assert_eq!(handle_tab(&mut doc, 0, true, 8), Some(0));
        assert_eq!(doc.paragraphs()[0].list(), ListKind::Bullet);
    }

    #[test]
    fn test_tab_past_max_indent_keeps_level() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("deep").with_list(ListKind::Bullet, 10),
        ]);
        assert_eq!(handle_tab(&mut doc, 0, false, 8), Some(10));
        assert_eq!(doc.paragraphs()[0].indent(), 10);
        assert_eq!(handle_tab(&mut doc, 0, true, 8), Some(9));
    }

    #[test]
    fn test_tab_on_plain_paragraph_falls_through() {
        let mut doc = StructuredDocument::with_paragraph("\tindented");
        assert_eq!(handle_tab(&mut doc, 0, false, 8), None);
        assert_eq!(doc.paragraphs()[0].indent(), 0);
    }
}
