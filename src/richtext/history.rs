use super::structured_document::{Paragraph, TextRange};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Editor state captured before an atomic edit group
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: &'static str,
    pub paragraphs: Vec<Paragraph>,
    pub selection: TextRange,
}

impl HistoryEntry {
    pub fn new(label: &'static str, paragraphs: Vec<Paragraph>, selection: TextRange) -> Self {
        HistoryEntry {
            label,
            paragraphs,
            selection,
        }
    }
}

/// Undo/redo stacks where one entry is one atomic edit group
#[derive(Debug)]
pub struct EditHistory {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        EditHistory {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state from before a group.
    /// This clears any redo history.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.undo.push(entry);

        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Step back. `current` is the live state, kept for redo.
    /// Returns the state to restore, or None if there is nothing to undo
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.undo.pop()?;
        self.redo.push(HistoryEntry {
            label: entry.label,
            ..current
        });
        Some(entry)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.undo.push(HistoryEntry {
            label: entry.label,
            ..current
        });
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
