//! Structured error types for the reflow engine.
//!
//! Malformed command records are never errors; they simply stop a window.
//! What remains are the failures that must stop a run before any list is
//! rewritten: unreadable input, a bad configuration, or a font that cannot
//! back the width oracle.

use std::path::PathBuf;

/// The unified error type returned by all public `refit` API functions.
#[derive(Debug, thiserror::Error)]
pub enum ReflowError {
    /// JSON input (game data or configuration) failed to parse.
    #[error("failed to parse JSON: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The width oracle could not be initialised.
    #[error("font error: {0}")]
    Font(String),
    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for ReflowError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the file truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReflowError::Parse { source: e, hint }
    }
}

impl ReflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReflowError::Io {
            path: path.into(),
            source,
        }
    }
}
