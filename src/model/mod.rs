//! # Command Model
//!
//! The input representation for the reflow engine. Game data stores event
//! scripts as flat lists of command records. Each record carries a numeric
//! `code` naming its kind, an `indent` level, and a `parameters` list. A
//! text-line command has exactly one string parameter: the literal display
//! text for one line of the message box.
//!
//! Records are round-tripped losslessly: fields the engine does not know
//! about are kept in [`Command::extra`] and serialized back unchanged.
//!
//! The remaining types are transient. They are built while scanning one
//! window and discarded as soon as the window has been rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Range;

/// Command code of a text line inside a "show text" block.
pub const TEXT_LINE_CODE: i64 = 401;

/// One record of an event command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Discriminant of the command kind.
    #[serde(default)]
    pub code: i64,

    /// Nesting depth inside the event script.
    #[serde(default)]
    pub indent: i64,

    /// Command arguments. Absent on some record shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,

    /// Everything else on the record, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Command {
    /// Build a text-line record holding a single display string.
    pub fn text_line(code: i64, text: impl Into<String>, indent: i64) -> Self {
        Self {
            code,
            indent,
            parameters: Some(vec![Value::String(text.into())]),
            extra: Map::new(),
        }
    }

    /// The display text, if this record has exactly one string parameter.
    ///
    /// Records with a missing parameter list, several parameters, or a
    /// non-string parameter return `None`.
    pub fn single_text(&self) -> Option<&str> {
        match self.parameters.as_deref() {
            Some([Value::String(s)]) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether the parameter list is absent or holds more than one entry.
    pub fn is_unknown_shape(&self) -> bool {
        match &self.parameters {
            None => true,
            Some(params) => params.len() > 1,
        }
    }
}

/// An immutable view of one text-line record taken during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    /// Position of the record in the host command list.
    pub sequence_index: usize,
    pub indent: i64,
}

/// A bounded run of contiguous text lines treated as one message.
///
/// `span` counts every record the window covers, including blank text lines
/// that were skipped rather than collected into `lines`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub span: usize,
    pub lines: Vec<RawLine>,
    /// The line limit closed the window while the message went on.
    pub truncated: bool,
}

impl Window {
    pub fn empty(start: usize) -> Self {
        Self {
            start,
            span: 0,
            lines: Vec::new(),
            truncated: false,
        }
    }

    /// Number of non-blank lines collected.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bounds of the window inside the host list.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.span
    }

    /// Indent of the first line, used for every rewritten record.
    pub fn indent(&self) -> i64 {
        self.lines.first().map(|l| l.indent).unwrap_or(0)
    }
}

/// A window's lines joined into one normalized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParagraph {
    pub text: String,
    pub indent: i64,
    /// An opening quotation mark appears in the first two characters.
    pub found_quote: bool,
    /// Bounds of the originating window in the host list.
    pub origin: Range<usize>,
}

/// A display line produced by wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    pub text: String,
    /// The first line never receives continuation padding.
    pub is_first: bool,
}

impl WrappedLine {
    /// Tag a plain list of strings, marking only the head as first.
    pub fn from_texts(texts: Vec<String>) -> Vec<WrappedLine> {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| WrappedLine {
                text,
                is_first: i == 0,
            })
            .collect()
    }
}
