// Marker glyphs and indent geometry for list paragraphs

use super::structured_document::{ListKind, Paragraph};
use crate::config::EditorConfig;

pub const BULLET_GLYPH: char = '•';
pub const UNCHECKED_GLYPH: char = '○';
pub const CHECKED_GLYPH: char = '◉';

pub fn marker_glyph(kind: ListKind) -> Option<char> {
    match kind {
        ListKind::None => None,
        ListKind::Bullet => Some(BULLET_GLYPH),
        ListKind::CheckboxUnchecked => Some(UNCHECKED_GLYPH),
        ListKind::CheckboxChecked => Some(CHECKED_GLYPH),
    }
}

/// How the host should lay out one paragraph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphLayout {
    pub marker: Option<char>,
    /// RGBA of the marker glyph
    pub marker_rgba: u32,
    /// Indent of the first line, where the marker sits
    pub first_line_indent: f32,
    /// Indent of wrapped lines, aligned with the text after the marker
    pub head_indent: f32,
    pub line_spacing: f32,
}

pub fn paragraph_layout(paragraph: &Paragraph, config: &EditorConfig) -> ParagraphLayout {
    let palette = config.palette();
    let marker = marker_glyph(paragraph.list());

    let (first_line_indent, head_indent) = if marker.is_some() {
        let indent = config.base_indent + f32::from(paragraph.indent()) * config.indent_unit;
        (indent, indent + config.marker_width)
    } else {
        (0.0, 0.0)
    };

    ParagraphLayout {
        marker,
        marker_rgba: palette.resolve(paragraph.marker_color()),
        first_line_indent,
        head_indent,
        line_spacing: config.line_spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Palette;

    #[test]
    fn test_plain_paragraph_has_no_marker() {
        let layout = paragraph_layout(&Paragraph::plain("x"), &EditorConfig::default());
        assert_eq!(layout.marker, None);
        assert_eq!(layout.first_line_indent, 0.0);
    }

    #[test]
    fn test_nested_checked_item() {
        let config = EditorConfig::default();
        let p = Paragraph::plain("done").with_list(ListKind::CheckboxChecked, 2);
        let layout = paragraph_layout(&p, &config);
        assert_eq!(layout.marker, Some(CHECKED_GLYPH));
        assert_eq!(layout.marker_rgba, Palette::default().accent);
        assert_eq!(layout.first_line_indent, 4.0 + 2.0 * 20.0);
        assert_eq!(layout.head_indent, layout.first_line_indent + 18.0);
    }

    #[test]
    fn test_unchecked_marker_uses_text_color() {
        let config = EditorConfig::default();
        let p = Paragraph::new().with_list(ListKind::CheckboxUnchecked, 0);
        let layout = paragraph_layout(&p, &config);
        assert_eq!(layout.marker_rgba, config.palette().text_rgba());
    }
}
