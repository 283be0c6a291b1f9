// Structured Editor
// Owns the document, the selection and the pending typing style. Every user
// intent is routed to one handler, which runs inside an atomic edit group and
// then schedules a toolbar snapshot.

use super::checkbox::{self, PointerHit};
use super::continuation::{self, EnterOutcome};
use super::history::{EditHistory, HistoryEntry};
use super::intent::{Intent, ToolbarCommand};
use super::lists;
use super::markers;
use super::plain_text::document_to_plain_text;
use super::publisher::{
    FormattingPublisher, FormattingSnapshot, ToolbarSink, compute_snapshot, guard_inherited_accent,
};
use super::structured_document::*;
use crate::config::EditorConfig;
use unicode_segmentation::UnicodeSegmentation;

/// The list-aware editor core
pub struct StructuredEditor {
    document: StructuredDocument,
    selection: TextRange,
    typing_style: CharStyle,
    history: EditHistory,
    publisher: FormattingPublisher,
    config: EditorConfig,
}

impl StructuredEditor {
    /// Create a new editor with an empty document
    pub fn new() -> Self {
        Self::with_config(StructuredDocument::new(), EditorConfig::default())
    }

    /// Create an editor with an existing document
    pub fn with_document(document: StructuredDocument) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: StructuredDocument, config: EditorConfig) -> Self {
        let mut editor = StructuredEditor {
            document,
            selection: TextRange::caret(0),
            typing_style: CharStyle::plain(),
            history: EditHistory::new(config.history_limit),
            publisher: FormattingPublisher::new(),
            config,
        };
        editor.refresh_typing_style();
        editor.schedule_publish();
        editor
    }

    /// Replace the document (e.g. when another note is opened). History is
    /// cleared and the caret goes to the end.
    pub fn load_document(&mut self, document: StructuredDocument) {
        self.document = document;
        self.history.clear();
        self.typing_style = CharStyle::plain();
        self.selection = TextRange::caret(self.document.len());
        self.refresh_typing_style();
        self.schedule_publish();
    }

    pub fn document(&self) -> &StructuredDocument {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    /// Caret position (start of the selection)
    pub fn cursor(&self) -> DocumentPosition {
        self.document.offset_to_position(self.selection.start)
    }

    /// Style the next typed char receives
    pub fn typing_style(&self) -> CharStyle {
        self.typing_style
    }

    /// RGBA the next typed char is drawn with
    pub fn typing_color_rgba(&self) -> u32 {
        self.config.palette().resolve(self.typing_style.color)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snapshot of the current state, computed on demand
    pub fn snapshot(&self) -> FormattingSnapshot {
        compute_snapshot(&self.document, self.selection, self.typing_style)
    }

    /// True while a snapshot waits for the next `flush_formatting`
    pub fn has_pending_formatting(&self) -> bool {
        self.publisher.has_pending()
    }

    /// Deliver the latest scheduled snapshot to the toolbar. Hosts call this
    /// from the event-loop tick after the edit, never from inside one.
    pub fn flush_formatting(&mut self, sink: &mut dyn ToolbarSink) -> bool {
        self.publisher.flush(sink)
    }

    pub fn to_plain_text(&self) -> String {
        document_to_plain_text(&self.document)
    }

    /// Route an intent to its handler. Returns whether it was handled; an
    /// unhandled intent is left to the host's default behavior.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        tracing::debug!(?intent, "dispatch");
        match intent {
            Intent::Type(text) => {
                self.insert_text(&text);
                true
            }
            Intent::CharacterInserted {
                paragraph,
                char_index,
            } => self.on_character_inserted(paragraph, char_index),
            Intent::Enter => self.on_enter_pressed(),
            Intent::Tab { shift } => self.on_tab_pressed(shift),
            Intent::PointerDown(hit) => self.on_pointer_down(hit),
            Intent::Toolbar(command) => {
                self.on_toolbar_command(command);
                true
            }
            Intent::SelectionChanged(range) => {
                self.on_selection_changed(range);
                true
            }
            Intent::Backspace => self.delete_backward(),
            Intent::Undo => self.undo(),
            Intent::Redo => self.redo(),
        }
    }

    /// Type text at the caret with the pending style. Newlines become plain
    /// paragraph breaks.
    pub fn insert_text(&mut self, text: &str) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.insert_paragraph_break();
            }
            self.insert_line(line);
        }
    }

    /// Chars go in one at a time, as keystrokes would, so a marker token is
    /// recognized when its trailing space arrives.
    fn insert_line(&mut self, line: &str) {
        let mut buf = [0u8; 4];
        for c in line.chars() {
            let text: &str = c.encode_utf8(&mut buf);
            let mut inserted_at = DocumentPosition::start();
            self.edit_group("typing", |editor| {
                editor.delete_selection();
                let cursor = editor.cursor();
                let style = editor.typing_style;
                if let Some(p) = editor.document.paragraph_mut(cursor.paragraph) {
                    p.insert_text(cursor.offset, text, style);
                }
                inserted_at = cursor;
                editor.set_caret(DocumentPosition::new(cursor.paragraph, cursor.offset + 1));
                true
            });
            self.on_character_inserted(inserted_at.paragraph, inserted_at.offset);
        }
    }

    /// A char was inserted at `char_index` of `paragraph`: convert a
    /// completed marker token into list formatting.
    pub fn on_character_inserted(&mut self, paragraph: usize, char_index: usize) -> bool {
        let Some(marker) = self
            .document
            .paragraph(paragraph)
            .and_then(|p| markers::recognize(p, char_index))
        else {
            return false;
        };

        self.edit_group("list from marker", |editor| {
            let removed = lists::apply_list(&mut editor.document, paragraph, &marker);
            let cursor = editor.cursor();
            if cursor.paragraph == paragraph {
                editor.set_caret(DocumentPosition::new(
                    paragraph,
                    cursor.offset.saturating_sub(removed),
                ));
            }
            editor.apply_list_typing_style();
            removed > 0
        })
    }

    /// Enter inside a list paragraph: continue, outdent or end the list.
    /// Returns false for plain paragraphs.
    pub fn on_enter_pressed(&mut self) -> bool {
        let in_list = self
            .document
            .paragraph(self.cursor().paragraph)
            .is_some_and(|p| p.list().is_list());
        if !in_list {
            return false;
        }

        self.edit_group("list enter", |editor| {
            editor.delete_selection();
            let cursor = editor.cursor();
            match continuation::handle_enter(&mut editor.document, cursor) {
                EnterOutcome::NotList => false,
                EnterOutcome::Continued { paragraph } | EnterOutcome::Terminated { paragraph } => {
                    editor.set_caret(DocumentPosition::new(paragraph, 0));
                    editor.apply_list_typing_style();
                    true
                }
                EnterOutcome::Outdented { .. } => {
                    editor.set_caret(cursor);
                    true
                }
            }
        })
    }

    /// Plain line break, the host's default for an unhandled Enter
    pub fn insert_paragraph_break(&mut self) {
        self.edit_group("line break", |editor| {
            editor.delete_selection();
            let index = editor.document.split_paragraph(editor.cursor());
            editor.set_caret(DocumentPosition::new(index, 0));
            editor.typing_style = guard_inherited_accent(editor.typing_style);
            true
        });
    }

    /// Tab / Shift-Tab on a list paragraph changes its nesting level
    pub fn on_tab_pressed(&mut self, shift: bool) -> bool {
        let paragraph = self.cursor().paragraph;
        let max_indent = self.config.max_indent;
        let label = if shift { "outdent" } else { "indent" };
        self.edit_group(label, |editor| {
            continuation::handle_tab(&mut editor.document, paragraph, shift, max_indent).is_some()
        })
    }

    /// A click on a checkbox glyph flips it; anything else falls through
    pub fn on_pointer_down(&mut self, hit: PointerHit) -> bool {
        let Some(paragraph) = checkbox::glyph_hit(&self.document, hit) else {
            return false;
        };
        self.edit_group("toggle checkbox", |editor| {
            if checkbox::toggle_checkbox(&mut editor.document, paragraph).is_none() {
                return false;
            }
            editor.typing_style = editor.typing_style.with_color(TextColor::Default);
            true
        })
    }

    pub fn on_toolbar_command(&mut self, command: ToolbarCommand) {
        if let Some(style) = command.list_style() {
            let paragraphs = self.document.paragraphs_in_range(self.selection);
            self.edit_group("toggle list", |editor| {
                lists::toggle_list(&mut editor.document, paragraphs, style);
                editor.apply_list_typing_style();
                true
            });
            return;
        }

        let current = self.snapshot();
        let apply: fn(&mut CharStyle, bool) = match command {
            ToolbarCommand::Bold => |s: &mut CharStyle, v: bool| s.bold = v,
            ToolbarCommand::Italic => |s: &mut CharStyle, v: bool| s.italic = v,
            ToolbarCommand::Underline => |s: &mut CharStyle, v: bool| s.underline = v,
            ToolbarCommand::Bullet | ToolbarCommand::Checkbox => return,
        };
        let value = !match command {
            ToolbarCommand::Bold => current.bold,
            ToolbarCommand::Italic => current.italic,
            _ => current.underline,
        };

        if self.selection.is_empty() {
            // nothing to restyle, only the next typed chars change
            apply(&mut self.typing_style, value);
            self.schedule_publish();
            return;
        }

        self.edit_group("format", |editor| {
            editor.map_selection_style(|s| apply(s, value));
            apply(&mut editor.typing_style, value);
            true
        });
    }

    /// The host moved the caret or changed the selection
    pub fn on_selection_changed(&mut self, range: TextRange) {
        self.selection = self.document.clamp_range(range);
        self.refresh_typing_style();
        self.schedule_publish();
    }

    /// Backspace. At the start of a list item the list formatting goes
    /// first; at the start of a plain paragraph it merges with the previous
    /// one. Otherwise one grapheme is removed.
    pub fn delete_backward(&mut self) -> bool {
        self.edit_group("delete", |editor| {
            if !editor.selection.is_empty() {
                editor.delete_selection();
                editor.refresh_typing_style();
                return true;
            }

            let cursor = editor.cursor();
            if cursor.offset == 0 {
                if lists::remove_list(&mut editor.document, cursor.paragraph) {
                    return true;
                }
                return match editor.document.merge_with_previous(cursor.paragraph) {
                    Some(pos) => {
                        editor.set_caret(pos);
                        editor.refresh_typing_style();
                        true
                    }
                    None => false,
                };
            }

            let Some(p) = editor.document.paragraph_mut(cursor.paragraph) else {
                return false;
            };
            let text = p.text();
            let end = text
                .char_indices()
                .nth(cursor.offset)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            let start = text[..end]
                .grapheme_indices(true)
                .next_back()
                .map(|(i, _)| text[..i].chars().count())
                .unwrap_or(0);
            p.delete_range(start, cursor.offset);
            editor.set_caret(DocumentPosition::new(cursor.paragraph, start));
            editor.refresh_typing_style();
            true
        })
    }

    /// Revert the last atomic edit group
    pub fn undo(&mut self) -> bool {
        let current = self.checkpoint("");
        let Some(entry) = self.history.undo(current) else {
            return false;
        };
        tracing::debug!(label = entry.label, "undo");
        self.restore(entry);
        true
    }

    pub fn redo(&mut self) -> bool {
        let current = self.checkpoint("");
        let Some(entry) = self.history.redo(current) else {
            return false;
        };
        tracing::debug!(label = entry.label, "redo");
        self.restore(entry);
        true
    }

    fn checkpoint(&self, label: &'static str) -> HistoryEntry {
        HistoryEntry::new(label, self.document.paragraphs().to_vec(), self.selection)
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.document.replace_paragraphs(entry.paragraphs);
        self.selection = self.document.clamp_range(entry.selection);
        self.refresh_typing_style();
        self.schedule_publish();
    }

    /// Run `edit` as one undo step. A group that leaves the document
    /// unchanged records nothing.
    fn edit_group<F>(&mut self, label: &'static str, edit: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let before = self.checkpoint(label);
        let handled = edit(self);
        if self.document.paragraphs() != before.paragraphs.as_slice() {
            tracing::debug!(label, "edit group committed");
            self.history.push(before);
        }
        if handled {
            self.schedule_publish();
        }
        handled
    }

    fn schedule_publish(&mut self) {
        let snapshot = self.snapshot();
        self.publisher.schedule(snapshot);
    }

    fn set_caret(&mut self, pos: DocumentPosition) {
        let offset = self.document.position_to_offset(pos);
        self.selection = TextRange::caret(offset);
    }

    fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let start = self.document.offset_to_position(self.selection.start);
        let end = self.document.offset_to_position(self.selection.end);
        self.document.delete_range(start, end);
        self.set_caret(start);
    }

    /// Apply `apply` to every selected char
    fn map_selection_style<F>(&mut self, mut apply: F)
    where
        F: FnMut(&mut CharStyle),
    {
        let start = self.document.offset_to_position(self.selection.start);
        let end = self.document.offset_to_position(self.selection.end);
        for index in start.paragraph..=end.paragraph {
            let Some(p) = self.document.paragraph_mut(index) else {
                break;
            };
            let from = if index == start.paragraph { start.offset } else { 0 };
            let to = if index == end.paragraph {
                end.offset
            } else {
                p.char_len()
            };
            p.map_style_range(from, to, &mut apply);
        }
    }

    /// Pending style after a list change, read from the text at the caret
    /// with the pending style as fallback for empty paragraphs
    fn apply_list_typing_style(&mut self) {
        let cursor = self.cursor();
        let base = match self.document.paragraph(cursor.paragraph) {
            Some(p) => lists::resolve_base_style(p, cursor.offset, self.typing_style).0,
            None => self.typing_style,
        };
        self.typing_style = lists::visible_typing_style(base);
    }

    /// Re-derive the pending style from the char before the caret. At the
    /// start of a list item that is the marker cell, whose color must not
    /// carry over into typed text.
    fn refresh_typing_style(&mut self) {
        let cursor = self.cursor();
        let Some(p) = self.document.paragraph(cursor.paragraph) else {
            return;
        };
        let style = if !self.selection.is_empty() {
            p.style_at(cursor.offset)
                .unwrap_or_else(|| lists::resolve_base_style(p, cursor.offset, self.typing_style).0)
        } else if cursor.offset == 0 && p.list().is_list() {
            let first = p.style_at(0).unwrap_or(self.typing_style);
            first.with_color(p.marker_color())
        } else {
            lists::resolve_base_style(p, cursor.offset, self.typing_style).0
        };
        self.typing_style = guard_inherited_accent(style);
    }
}

impl Default for StructuredEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_chars(editor: &mut StructuredEditor, text: &str) {
        for c in text.chars() {
            editor.insert_text(&c.to_string());
        }
    }

    #[test]
    fn test_insert_text() {
        let mut editor = StructuredEditor::new();
        editor.insert_text("Hello");
        assert_eq!(editor.document().to_text(), "Hello");
        assert_eq!(editor.cursor().offset, 5);
    }

    #[test]
    fn test_dash_space_becomes_bullet() {
        let mut editor = StructuredEditor::new();
        type_chars(&mut editor, "- ");
        let p = &editor.document().paragraphs()[0];
        assert_eq!(p.list(), ListKind::Bullet);
        assert_eq!(p.text(), "");
        assert_eq!(editor.cursor(), DocumentPosition::new(0, 0));
        type_chars(&mut editor, "milk");
        assert_eq!(editor.to_plain_text(), "• milk");
    }

    #[test]
    fn test_marker_keeps_bold_typing_style() {
        let mut editor = StructuredEditor::new();
        editor.on_toolbar_command(ToolbarCommand::Bold);
        type_chars(&mut editor, "[] ");
        assert_eq!(
            editor.document().paragraphs()[0].list(),
            ListKind::CheckboxUnchecked
        );
        assert!(editor.typing_style().bold);
        assert!(editor.snapshot().checkbox);
    }

    #[test]
    fn test_dash_inside_text_is_not_a_marker() {
        let mut editor = StructuredEditor::new();
        type_chars(&mut editor, "a - b");
        assert_eq!(editor.document().paragraphs()[0].list(), ListKind::None);
    }

    #[test]
    fn test_enter_continues_and_terminates() {
        let mut editor = StructuredEditor::new();
        type_chars(&mut editor, "- abc");
        assert!(editor.on_enter_pressed());
        assert_eq!(editor.document().paragraph_count(), 2);
        assert_eq!(editor.document().paragraphs()[1].list(), ListKind::Bullet);
        assert_eq!(editor.cursor(), DocumentPosition::new(1, 0));

        assert!(editor.on_enter_pressed());
        let paragraphs = editor.document().paragraphs();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[1].list(), ListKind::None);
        assert_eq!(paragraphs[2].list(), ListKind::None);
        assert_eq!(editor.cursor(), DocumentPosition::new(2, 0));
    }

    #[test]
    fn test_enter_on_plain_paragraph_is_not_handled() {
        let mut editor = StructuredEditor::with_document(StructuredDocument::with_paragraph("x"));
        assert!(!editor.on_enter_pressed());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_enter_replaces_selection() {
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("abcdef").with_list(ListKind::Bullet, 0),
        ]);
        let mut editor = StructuredEditor::with_document(doc);
        editor.on_selection_changed(TextRange::new(2, 4));
        assert!(editor.on_enter_pressed());
        assert_eq!(editor.document().to_text(), "ab\nef");
        assert_eq!(editor.cursor(), DocumentPosition::new(1, 0));
    }

    #[test]
    fn test_tab_respects_max_indent() {
        let config = EditorConfig {
            max_indent: 2,
            ..Default::default()
        };
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("x").with_list(ListKind::Bullet, 0),
        ]);
        let mut editor = StructuredEditor::with_config(doc, config);
        for _ in 0..5 {
            assert!(editor.on_tab_pressed(false));
        }
        assert_eq!(editor.document().paragraphs()[0].indent(), 2);
    }

    #[test]
    fn test_checkbox_click_resets_typing_color() {
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("task").with_list(ListKind::CheckboxUnchecked, 0),
        ]);
        let mut editor = StructuredEditor::with_document(doc);
        editor.on_selection_changed(TextRange::caret(4));
        assert!(editor.on_pointer_down(PointerHit::new(0, 0)));
        let p = &editor.document().paragraphs()[0];
        assert_eq!(p.list(), ListKind::CheckboxChecked);
        assert_eq!(editor.typing_style().color, TextColor::Default);
        type_chars(&mut editor, "!");
        let p = &editor.document().paragraphs()[0];
        assert!(p.runs().iter().all(|r| r.style.color == TextColor::Default));
    }

    #[test]
    fn test_caret_at_checked_item_start_does_not_inherit_accent() {
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("done").with_list(ListKind::CheckboxChecked, 0),
        ]);
        let mut editor = StructuredEditor::with_document(doc);
        editor.on_selection_changed(TextRange::caret(0));
        assert_eq!(editor.typing_style().color, TextColor::Default);
    }

    #[test]
    fn test_bold_without_selection_only_changes_pending_style() {
        let mut editor = StructuredEditor::with_document(StructuredDocument::with_paragraph("abc"));
        editor.on_selection_changed(TextRange::caret(3));
        let before = editor.document().clone();
        editor.on_toolbar_command(ToolbarCommand::Bold);
        assert_eq!(editor.document(), &before);
        assert!(editor.typing_style().bold);
        assert!(editor.snapshot().bold);
        editor.insert_text("d");
        assert_eq!(editor.document().paragraphs()[0].style_at(3), Some(CharStyle::bold()));
    }

    #[test]
    fn test_bold_over_selection_across_paragraphs() {
        let mut editor = StructuredEditor::with_document(StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("First"),
            Paragraph::plain("Second"),
        ]));
        editor.on_selection_changed(TextRange::new(3, 8));
        editor.on_toolbar_command(ToolbarCommand::Bold);
        let paragraphs = editor.document().paragraphs();
        assert_eq!(paragraphs[0].style_at(2), Some(CharStyle::plain()));
        assert_eq!(paragraphs[0].style_at(3), Some(CharStyle::bold()));
        assert_eq!(paragraphs[1].style_at(1), Some(CharStyle::bold()));
        assert_eq!(paragraphs[1].style_at(2), Some(CharStyle::plain()));
        assert!(editor.snapshot().bold);

        editor.on_toolbar_command(ToolbarCommand::Bold);
        assert!(editor.document().paragraphs()[1].runs().len() == 1);
    }

    #[test]
    fn test_backspace_removes_list_then_merges() {
        let doc = StructuredDocument::from_paragraphs(vec![
            Paragraph::plain("a"),
            Paragraph::plain("b").with_list(ListKind::Bullet, 1),
        ]);
        let mut editor = StructuredEditor::with_document(doc);
        editor.on_selection_changed(TextRange::caret(2));
        assert!(editor.delete_backward());
        assert_eq!(editor.document().paragraphs()[1].list(), ListKind::None);
        assert!(editor.delete_backward());
        assert_eq!(editor.document().to_text(), "ab");
        assert_eq!(editor.cursor(), DocumentPosition::new(0, 1));
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut editor = StructuredEditor::new();
        editor.insert_text("ae\u{301}");
        assert!(editor.delete_backward());
        assert_eq!(editor.document().to_text(), "a");
        assert!(editor.delete_backward());
        assert!(!editor.delete_backward());
    }

    #[test]
    fn test_undo_reverts_marker_conversion_in_one_step() {
        let mut editor = StructuredEditor::new();
        type_chars(&mut editor, "- ");
        assert!(editor.undo());
        assert_eq!(editor.document().paragraphs()[0].text(), "- ");
        assert_eq!(editor.document().paragraphs()[0].list(), ListKind::None);
        assert!(editor.redo());
        assert_eq!(editor.document().paragraphs()[0].list(), ListKind::Bullet);
    }

    #[test]
    fn test_publication_is_deferred_until_flush() {
        let mut editor = StructuredEditor::new();
        let mut seen = Vec::new();
        editor.flush_formatting(&mut |s: FormattingSnapshot| seen.push(s));
        editor.on_toolbar_command(ToolbarCommand::Bullet);
        editor.on_toolbar_command(ToolbarCommand::Bold);
        assert!(editor.has_pending_formatting());
        editor.flush_formatting(&mut |s: FormattingSnapshot| seen.push(s));
        assert_eq!(seen.len(), 2);
        assert!(seen[1].bullet && seen[1].bold);
    }

    #[test]
    fn test_dispatch_routes_intents() {
        let mut editor = StructuredEditor::new();
        assert!(editor.dispatch(Intent::Toolbar(ToolbarCommand::Checkbox)));
        assert!(editor.dispatch(Intent::Type("x".into())));
        assert!(editor.dispatch(Intent::PointerDown(PointerHit::new(0, 1))));
        assert!(!editor.dispatch(Intent::PointerDown(PointerHit::new(0, 3))));
        assert_eq!(editor.to_plain_text(), "◉ x");
    }

    #[test]
    fn test_load_document_resets_history() {
        let mut editor = StructuredEditor::new();
        editor.insert_text("abc");
        assert!(editor.can_undo());
        editor.load_document(StructuredDocument::with_paragraph("note"));
        assert!(!editor.can_undo());
        assert_eq!(editor.cursor(), DocumentPosition::new(0, 4));
    }
}
