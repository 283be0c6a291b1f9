// Structured Document Model
// Paragraph-level list state and character runs for the notes editor.
// List markers are structural: the glyph is rendered from `ListKind`, it is
// never stored in paragraph text.

use std::cmp::{max, min};
use std::fmt;
use std::ops::RangeInclusive;

/// Separator between paragraphs in the flattened document text
pub const PARAGRAPH_SEPARATOR: char = '\n';

/// Semantic text color. Concrete RGBA values come from the theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextColor {
    #[default]
    Default,
    /// Marks a completed checklist glyph
    Accent,
}

/// Character-level formatting of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: TextColor,
}

impl CharStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        CharStyle {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        CharStyle {
            italic: true,
            ..Default::default()
        }
    }

    pub fn with_color(self, color: TextColor) -> Self {
        CharStyle { color, ..self }
    }
}

/// A maximal span of characters sharing one `CharStyle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Length in chars
    pub len: usize,
    pub style: CharStyle,
}

impl Run {
    pub fn new(len: usize, style: CharStyle) -> Self {
        Run { len, style }
    }
}

/// Paragraph-level list formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    #[default]
    None,
    Bullet,
    CheckboxUnchecked,
    CheckboxChecked,
}

impl ListKind {
    pub fn is_list(self) -> bool {
        self != ListKind::None
    }

    pub fn is_checkbox(self) -> bool {
        matches!(
            self,
            ListKind::CheckboxUnchecked | ListKind::CheckboxChecked
        )
    }

    /// The toolbar family this kind belongs to
    pub fn style(self) -> Option<ListStyle> {
        match self {
            ListKind::None => None,
            ListKind::Bullet => Some(ListStyle::Bullet),
            ListKind::CheckboxUnchecked | ListKind::CheckboxChecked => Some(ListStyle::Checkbox),
        }
    }

    /// Glyph color a marker of this kind carries when it is first created
    pub fn default_marker_color(self) -> TextColor {
        match self {
            ListKind::CheckboxChecked => TextColor::Accent,
            _ => TextColor::Default,
        }
    }
}

/// List family as exposed to the toolbar (checked and unchecked are one family)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bullet,
    Checkbox,
}

impl ListStyle {
    /// The kind a paragraph gets when this family is switched on
    pub fn initial_kind(self) -> ListKind {
        match self {
            ListStyle::Bullet => ListKind::Bullet,
            ListStyle::Checkbox => ListKind::CheckboxUnchecked,
        }
    }
}

/// Convert a char offset into a byte index of `text`, clamping to the end
fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// A line-level unit of the document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    text: String,
    list: ListKind,
    indent: u8,
    marker_color: TextColor,
    runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new().with_text(text, CharStyle::plain())
    }

    /// Append styled text (builder)
    pub fn with_text(mut self, text: impl Into<String>, style: CharStyle) -> Self {
        let text = text.into();
        let end = self.char_len();
        self.insert_text(end, &text, style);
        self
    }

    /// Set list formatting while building a paragraph (e.g. on document load)
    pub fn with_list(mut self, kind: ListKind, indent: u8) -> Self {
        self.set_list(kind, indent);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn list(&self) -> ListKind {
        self.list
    }

    pub fn indent(&self) -> u8 {
        self.indent
    }

    pub fn marker_color(&self) -> TextColor {
        self.marker_color
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Length in chars
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if the paragraph holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Style of the char at `offset`, if there is one
    pub fn style_at(&self, offset: usize) -> Option<CharStyle> {
        let mut pos = 0;
        for run in &self.runs {
            if offset < pos + run.len {
                return Some(run.style);
            }
            pos += run.len;
        }
        None
    }

    /// Set list formatting. The marker takes the default color for `kind`,
    /// and the indent is dropped when the list is removed.
    pub(crate) fn set_list(&mut self, kind: ListKind, indent: u8) {
        self.list = kind;
        self.indent = if kind.is_list() { indent } else { 0 };
        self.marker_color = kind.default_marker_color();
    }

    pub(crate) fn set_indent(&mut self, indent: u8) {
        if self.list.is_list() {
            self.indent = indent;
        }
    }

    pub(crate) fn set_marker_color(&mut self, color: TextColor) {
        self.marker_color = color;
    }

    /// Insert text at a char offset, styled with `style`
    pub fn insert_text(&mut self, offset: usize, text: &str, style: CharStyle) {
        let count = text.chars().count();
        if count == 0 {
            return;
        }
        let offset = min(offset, self.char_len());
        let at = byte_index(&self.text, offset);
        self.text.insert_str(at, text);

        let index = self.split_run_at(offset);
        self.runs.insert(index, Run::new(count, style));
        self.normalize();
    }

    /// Delete chars in [start..end)
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let start = min(start, len);
        let end = min(end, len);
        if start >= end {
            return;
        }
        let from = byte_index(&self.text, start);
        let to = byte_index(&self.text, end);
        self.text.drain(from..to);

        let first = self.split_run_at(start);
        let last = self.split_run_at(end);
        self.runs.drain(first..last);
        self.normalize();
    }

    /// Apply `apply` to the style of every char in [start..end). The range is
    /// bounded: chars outside it keep their style.
    pub fn map_style_range<F>(&mut self, start: usize, end: usize, mut apply: F)
    where
        F: FnMut(&mut CharStyle),
    {
        let len = self.char_len();
        let start = min(start, len);
        let end = min(end, len);
        if start >= end {
            return;
        }
        let first = self.split_run_at(start);
        let last = self.split_run_at(end);
        for run in &mut self.runs[first..last] {
            apply(&mut run.style);
        }
        self.normalize();
    }

    /// Split at a char offset; the right half is returned as a plain
    /// (non-list) paragraph and `self` keeps the left half.
    pub fn split_off(&mut self, offset: usize) -> Paragraph {
        let offset = min(offset, self.char_len());
        let at = byte_index(&self.text, offset);
        let right_text = self.text.split_off(at);
        let index = self.split_run_at(offset);
        let right_runs = self.runs.split_off(index);

        let mut right = Paragraph {
            text: right_text,
            runs: right_runs,
            ..Default::default()
        };
        right.normalize();
        self.normalize();
        right
    }

    /// Append the text and runs of `other`; list formatting of `other` is dropped
    pub fn append(&mut self, other: Paragraph) {
        self.text.push_str(&other.text);
        self.runs.extend(other.runs);
        self.normalize();
    }

    /// Ensure a run boundary at `offset`; returns the index of the first run
    /// starting at or after `offset`
    fn split_run_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for index in 0..self.runs.len() {
            let run = self.runs[index];
            if offset == pos {
                return index;
            }
            if offset < pos + run.len {
                let left = offset - pos;
                self.runs[index].len = left;
                self.runs.insert(index + 1, Run::new(run.len - left, run.style));
                return index + 1;
            }
            pos += run.len;
        }
        self.runs.len()
    }

    /// Drop empty runs and merge neighbours with equal style
    fn normalize(&mut self) {
        let mut normalized: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            if let Some(prev) = normalized.last_mut()
                && prev.style == run.style
            {
                prev.len += run.len;
                continue;
            }
            normalized.push(run);
        }
        self.runs = normalized;
    }

    /// Check the run invariants: maximal, non-empty, covering the text exactly
    pub fn runs_are_consistent(&self) -> bool {
        let covers = self.char_len() == self.text.chars().count();
        let non_empty = self.runs.iter().all(|r| r.len > 0);
        let maximal = self.runs.windows(2).all(|w| w[0].style != w[1].style);
        covers && non_empty && maximal
    }
}

/// Position within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentPosition {
    pub paragraph: usize,
    /// Char offset within the paragraph text
    pub offset: usize,
}

impl DocumentPosition {
    pub fn new(paragraph: usize, offset: usize) -> Self {
        DocumentPosition { paragraph, offset }
    }

    pub fn start() -> Self {
        DocumentPosition::new(0, 0)
    }
}

/// Half-open char range over the flattened document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Build a range, ordering the endpoints
    pub fn new(a: usize, b: usize) -> Self {
        TextRange {
            start: min(a, b),
            end: max(a, b),
        }
    }

    pub fn caret(offset: usize) -> Self {
        TextRange::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// The structured document: a never-empty sequence of paragraphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDocument {
    paragraphs: Vec<Paragraph>,
}

impl StructuredDocument {
    pub fn new() -> Self {
        StructuredDocument {
            paragraphs: vec![Paragraph::new()],
        }
    }

    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            return Self::new();
        }
        StructuredDocument { paragraphs }
    }

    /// Create a simple document with one plain paragraph
    pub fn with_paragraph(text: impl Into<String>) -> Self {
        Self::from_paragraphs(vec![Paragraph::plain(text)])
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    pub(crate) fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(index)
    }

    pub(crate) fn replace_paragraphs(&mut self, paragraphs: Vec<Paragraph>) {
        self.paragraphs = paragraphs;
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::new());
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub(crate) fn insert_paragraph(&mut self, index: usize, paragraph: Paragraph) {
        let index = min(index, self.paragraphs.len());
        self.paragraphs.insert(index, paragraph);
    }

    /// Total length of the flattened text, separators included
    pub fn len(&self) -> usize {
        let chars: usize = self.paragraphs.iter().map(|p| p.char_len()).sum();
        chars + self.paragraphs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate and clamp a position to document bounds
    pub fn clamp_position(&self, pos: DocumentPosition) -> DocumentPosition {
        let paragraph = min(pos.paragraph, self.paragraphs.len() - 1);
        let offset = min(pos.offset, self.paragraphs[paragraph].char_len());
        DocumentPosition::new(paragraph, offset)
    }

    pub fn clamp_range(&self, range: TextRange) -> TextRange {
        let len = self.len();
        TextRange::new(min(range.start, len), min(range.end, len))
    }

    /// Flattened offset of a position
    pub fn position_to_offset(&self, pos: DocumentPosition) -> usize {
        let pos = self.clamp_position(pos);
        let before: usize = self.paragraphs[..pos.paragraph]
            .iter()
            .map(|p| p.char_len() + 1)
            .sum();
        before + pos.offset
    }

    /// Position of a flattened offset; a separator offset maps to the end of
    /// the paragraph before it
    pub fn offset_to_position(&self, offset: usize) -> DocumentPosition {
        let mut remaining = offset;
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            let len = paragraph.char_len();
            if remaining <= len {
                return DocumentPosition::new(index, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.paragraphs.len() - 1;
        DocumentPosition::new(last, self.paragraphs[last].char_len())
    }

    /// Indices of every paragraph touched by `range`
    pub fn paragraphs_in_range(&self, range: TextRange) -> RangeInclusive<usize> {
        let range = self.clamp_range(range);
        let first = self.offset_to_position(range.start).paragraph;
        let last = self.offset_to_position(range.end).paragraph;
        first..=last
    }

    /// Delete content between two positions, merging paragraphs when the
    /// range spans several. The first paragraph keeps its list formatting.
    pub fn delete_range(&mut self, start: DocumentPosition, end: DocumentPosition) {
        let mut a = self.clamp_position(start);
        let mut b = self.clamp_position(end);
        if b < a {
            std::mem::swap(&mut a, &mut b);
        }

        if a.paragraph == b.paragraph {
            self.paragraphs[a.paragraph].delete_range(a.offset, b.offset);
            return;
        }

        let tail = self.paragraphs[b.paragraph].split_off(b.offset);
        self.paragraphs.drain(a.paragraph + 1..=b.paragraph);
        let first = &mut self.paragraphs[a.paragraph];
        let len = first.char_len();
        first.delete_range(a.offset, len);
        first.append(tail);
    }

    /// Split the paragraph at `pos`. The new paragraph is plain; callers that
    /// continue a list set its formatting afterwards. Returns its index.
    pub fn split_paragraph(&mut self, pos: DocumentPosition) -> usize {
        let pos = self.clamp_position(pos);
        let right = self.paragraphs[pos.paragraph].split_off(pos.offset);
        self.paragraphs.insert(pos.paragraph + 1, right);
        pos.paragraph + 1
    }

    /// Merge paragraph `index` into the one before it. Returns the merge
    /// point, or `None` for the first paragraph.
    pub fn merge_with_previous(&mut self, index: usize) -> Option<DocumentPosition> {
        if index == 0 || index >= self.paragraphs.len() {
            return None;
        }
        let current = self.paragraphs.remove(index);
        let previous = &mut self.paragraphs[index - 1];
        let offset = previous.char_len();
        previous.append(current);
        Some(DocumentPosition::new(index - 1, offset))
    }

    /// Flattened text without list glyphs
    pub fn to_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StructuredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StructuredDocument ({} paragraphs):", self.paragraphs.len())?;
        for (i, paragraph) in self.paragraphs.iter().enumerate() {
            write!(f, "  [{}] ", i)?;
            match paragraph.list {
                ListKind::None => write!(f, "Plain")?,
                ListKind::Bullet => write!(f, "Bullet(indent {})", paragraph.indent)?,
                ListKind::CheckboxUnchecked => {
                    write!(f, "Checkbox(unchecked, indent {})", paragraph.indent)?
                }
                ListKind::CheckboxChecked => {
                    write!(f, "Checkbox(checked, indent {})", paragraph.indent)?
                }
            }
            if paragraph.marker_color == TextColor::Accent {
                write!(f, " accent-marker")?;
            }
            write!(f, ": {:?}", paragraph.text)?;
            for run in &paragraph.runs {
                let s = run.style;
                let mut flags = String::new();
                if s.bold {
                    flags.push('b');
                }
                if s.italic {
                    flags.push('i');
                }
                if s.underline {
                    flags.push('u');
                }
                if s.color == TextColor::Accent {
                    flags.push('a');
                }
                if flags.is_empty() {
                    flags.push('-');
                }
                write!(f, " {}{}", run.len, flags)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_text_merges_equal_runs() {
        let mut p = Paragraph::plain("hello");
        p.insert_text(5, " world", CharStyle::plain());
        assert_eq!(p.text(), "hello world");
        assert_eq!(p.runs(), &[Run::new(11, CharStyle::plain())]);
        assert!(p.runs_are_consistent());
    }

    #[test]
    fn test_insert_styled_text_in_middle() {
        let mut p = Paragraph::plain("ac");
        p.insert_text(1, "b", CharStyle::bold());
        assert_eq!(p.text(), "abc");
        assert_eq!(p.runs().len(), 3);
        assert_eq!(p.style_at(1), Some(CharStyle::bold()));
        assert!(p.runs_are_consistent());
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let mut p = Paragraph::plain("größe");
        p.insert_text(3, "X", CharStyle::plain());
        assert_eq!(p.text(), "gröXße");
        p.delete_range(2, 4);
        assert_eq!(p.text(), "grße");
        assert_eq!(p.char_len(), 4);
    }

    #[test]
    fn test_delete_range_rejoins_runs() {
        let mut p = Paragraph::plain("ab").with_text("X", CharStyle::bold());
        p.insert_text(3, "cd", CharStyle::plain());
        assert_eq!(p.runs().len(), 3);
        p.delete_range(2, 3);
        assert_eq!(p.text(), "abcd");
        assert_eq!(p.runs(), &[Run::new(4, CharStyle::plain())]);
    }

    #[test]
    fn test_map_style_range_is_bounded() {
        let mut p = Paragraph::plain("abcdef");
        p.map_style_range(1, 2, |s| s.color = TextColor::Accent);
        assert_eq!(p.style_at(0).map(|s| s.color), Some(TextColor::Default));
        assert_eq!(p.style_at(1).map(|s| s.color), Some(TextColor::Accent));
        assert_eq!(p.style_at(2).map(|s| s.color), Some(TextColor::Default));
        assert!(p.runs_are_consistent());
    }

    #[test]
    fn test_split_off_returns_plain_right_half() {
        let mut p = Paragraph::plain("abc")
            .with_text("def", CharStyle::italic())
            .with_list(ListKind::Bullet, 2);
        let right = p.split_off(4);
        assert_eq!(p.text(), "abcd");
        assert_eq!(right.text(), "ef");
        assert_eq!(right.list(), ListKind::None);
        assert_eq!(right.style_at(0), Some(CharStyle::italic()));
        assert_eq!(p.list(), ListKind::Bullet);
        assert!(p.runs_are_consistent() && right.runs_are_consistent());
    }

    #[test]
    fn test_set_list_none_drops_indent() {
        let mut p = Paragraph::new().with_list(ListKind::CheckboxChecked, 3);
        assert_eq!(p.marker_color(), TextColor::Accent);
        p.set_list(ListKind::None, 3);
        assert_eq!(p.indent(), 0);
        assert_eq!(p.marker_color(), TextColor::Default);
    }

    #[test]
    fn test_offsets_round_trip_through_positions() {
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("abc"),
            Paragraph::new(),
            Paragraph::plain("de"),
        ]);
        assert_eq!(doc.len(), 7);
        assert_eq!(doc.offset_to_position(3), DocumentPosition::new(0, 3));
        assert_eq!(doc.offset_to_position(4), DocumentPosition::new(1, 0));
        assert_eq!(doc.offset_to_position(5), DocumentPosition::new(2, 0));
        assert_eq!(doc.position_to_offset(DocumentPosition::new(2, 2)), 7);
        assert_eq!(doc.offset_to_position(100), DocumentPosition::new(2, 2));
    }

    #[test]
    fn test_empty_document_has_one_paragraph() {
        let doc = StructuredDocument::from_paragraphs(Vec::new());
        assert_eq!(doc.paragraph_count(), 1);
        assert!(doc.is_empty());
        assert_eq!(doc.paragraphs_in_range(TextRange::new(0, 10)), 0..=0);
    }

    #[test]
    fn test_delete_range_across_paragraphs_merges() {
        let mut doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("First para").with_list(ListKind::Bullet, 1),
            Paragraph::plain("Second"),
            Paragraph::plain("Third para"),
        ]);
        doc.delete_range(DocumentPosition::new(0, 3), DocumentPosition::new(2, 2));
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.paragraphs()[0].text(), "Firird para");
        assert_eq!(doc.paragraphs()[0].list(), ListKind::Bullet);
    }

    #[test]
    fn test_split_and_merge() {
        let mut doc = StructuredDocument::with_paragraph("Hello world");
        let index = doc.split_paragraph(DocumentPosition::new(0, 5));
        assert_eq!(index, 1);
        assert_eq!(doc.to_text(), "Hello\n world");
        let merged = doc.merge_with_previous(1);
        assert_eq!(merged, Some(DocumentPosition::new(0, 5)));
        assert_eq!(doc.to_text(), "Hello world");
        assert_eq!(doc.merge_with_previous(0), None);
    }
}
