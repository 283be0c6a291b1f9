use super::checkbox::PointerHit;
use super::structured_document::{ListStyle, TextRange};

/// Toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    Bold,
    Italic,
    Underline,
    Bullet,
    Checkbox,
}

impl ToolbarCommand {
    pub fn list_style(self) -> Option<ListStyle> {
        match self {
            ToolbarCommand::Bullet => Some(ListStyle::Bullet),
            ToolbarCommand::Checkbox => Some(ListStyle::Checkbox),
            _ => None,
        }
    }
}

/// A discrete user intent delivered by the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Text typed at the caret
    Type(String),
    /// The host inserted a char itself and reports where
    CharacterInserted { paragraph: usize, char_index: usize },
    Enter,
    Tab { shift: bool },
    PointerDown(PointerHit),
    Toolbar(ToolbarCommand),
    SelectionChanged(TextRange),
    Backspace,
    Undo,
    Redo,
}
