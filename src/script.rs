// Intent scripts
// One command per line; replayed against a StructuredEditor the way a host
// UI would deliver the same keystrokes, clicks and toolbar presses.

use crate::richtext::checkbox::PointerHit;
use crate::richtext::intent::{Intent, ToolbarCommand};
use crate::richtext::publisher::FormattingSnapshot;
use crate::richtext::structured_document::TextRange;
use crate::richtext::structured_editor::StructuredEditor;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptErrorKind {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected} argument(s)")]
    WrongArity {
        command: &'static str,
        expected: usize,
    },
    #[error("invalid number: {0}")]
    InvalidNumber(#[from] ParseIntError),
}

/// A parsed script: intents paired with their source line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub steps: Vec<(usize, Intent)>,
}

impl Script {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn numbers<const N: usize>(
    command: &'static str,
    args: &str,
) -> Result<[usize; N], ScriptErrorKind> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != N {
        return Err(ScriptErrorKind::WrongArity {
            command,
            expected: N,
        });
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse()?;
    }
    Ok(out)
}

fn no_args(command: &'static str, args: &str, intent: Intent) -> Result<Intent, ScriptErrorKind> {
    if args.trim().is_empty() {
        Ok(intent)
    } else {
        Err(ScriptErrorKind::WrongArity {
            command,
            expected: 0,
        })
    }
}

fn parse_line(line: &str) -> Result<Option<Intent>, ScriptErrorKind> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (command, args) = match trimmed.split_once(' ') {
        Some((command, args)) => (command, args),
        None => (trimmed.trim_end(), ""),
    };

    let intent = match command {
        // everything after the first space is typed verbatim
        "type" => Intent::Type(args.to_string()),
        "enter" => no_args("enter", args, Intent::Enter)?,
        "tab" => no_args("tab", args, Intent::Tab { shift: false })?,
        "shift-tab" => no_args("shift-tab", args, Intent::Tab { shift: true })?,
        "backspace" => no_args("backspace", args, Intent::Backspace)?,
        "undo" => no_args("undo", args, Intent::Undo)?,
        "redo" => no_args("redo", args, Intent::Redo)?,
        "bold" => no_args("bold", args, Intent::Toolbar(ToolbarCommand::Bold))?,
        "italic" => no_args("italic", args, Intent::Toolbar(ToolbarCommand::Italic))?,
        "underline" => no_args(
            "underline",
            args,
            Intent::Toolbar(ToolbarCommand::Underline),
        )?,
        "bullet" => no_args("bullet", args, Intent::Toolbar(ToolbarCommand::Bullet))?,
        "checkbox" => no_args(
            "checkbox",
            args,
            Intent::Toolbar(ToolbarCommand::Checkbox),
        )?,
        "click" => {
            let [paragraph, column] = numbers::<2>("click", args)?;
            Intent::PointerDown(PointerHit::new(paragraph, column))
        }
        "select" => {
            let [start, end] = numbers::<2>("select", args)?;
            Intent::SelectionChanged(TextRange::new(start, end))
        }
        other => return Err(ScriptErrorKind::UnknownCommand(other.to_string())),
    };
    Ok(Some(intent))
}

/// Parse a whole script. Line numbers in errors are 1-based.
pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    let mut steps = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let parsed = parse_line(line).map_err(|kind| ScriptError {
            line: line_no,
            kind,
        })?;
        if let Some(intent) = parsed {
            steps.push((line_no, intent));
        }
    }
    Ok(Script { steps })
}

/// Replay `script` against `editor`. An Enter the editor does not handle
/// gets the host default, a plain paragraph break. Pending toolbar
/// publications are flushed after every step, as an event loop would.
///
/// Returns every snapshot delivered to the toolbar.
pub fn run_script(editor: &mut StructuredEditor, script: &Script) -> Vec<FormattingSnapshot> {
    let mut delivered = Vec::new();
    let mut sink = |snapshot: FormattingSnapshot| delivered.push(snapshot);

    editor.flush_formatting(&mut sink);
    for (line, intent) in &script.steps {
        let is_enter = *intent == Intent::Enter;
        let handled = editor.dispatch(intent.clone());
        if !handled {
            if is_enter {
                editor.insert_paragraph_break();
            } else {
                tracing::debug!(line, ?intent, "intent not handled");
            }
        }
        editor.flush_formatting(&mut sink);
    }
    delivered
}
