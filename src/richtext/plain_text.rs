// Plain-text representation of a document, as kept in the notes cache:
// list paragraphs become "\t\t• text", "○ text" or "◉ text" lines.

use super::layout::{BULLET_GLYPH, CHECKED_GLYPH, UNCHECKED_GLYPH, marker_glyph};
use super::structured_document::{ListKind, Paragraph, StructuredDocument};

pub fn document_to_plain_text(doc: &StructuredDocument) -> String {
    let mut out = String::new();
    for (index, paragraph) in doc.paragraphs().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if let Some(glyph) = marker_glyph(paragraph.list()) {
            for _ in 0..paragraph.indent() {
                out.push('\t');
            }
            out.push(glyph);
            out.push(' ');
        }
        out.push_str(paragraph.text());
    }
    out
}

fn parse_line(line: &str) -> Paragraph {
    let body = line.trim_start_matches('\t');
    let tabs = line.len() - body.len();

    let mut chars = body.chars();
    let kind = match chars.next() {
        Some(BULLET_GLYPH) => ListKind::Bullet,
        Some(UNCHECKED_GLYPH) => ListKind::CheckboxUnchecked,
        Some(CHECKED_GLYPH) => ListKind::CheckboxChecked,
        _ => ListKind::None,
    };
    if kind.is_list()
        && let Some(text) = chars.as_str().strip_prefix(' ')
    {
        let indent = u8::try_from(tabs).unwrap_or(u8::MAX);
        return Paragraph::plain(text).with_list(kind, indent);
    }
    Paragraph::plain(line)
}

pub fn document_from_plain_text(text: &str) -> StructuredDocument {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    StructuredDocument::from_paragraphs(text.split('\n').map(parse_line).collect())
}
