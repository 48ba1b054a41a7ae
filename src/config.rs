//! # Configuration
//!
//! Every knob the engine reads, with defaults matching a 24px Japanese
//! message window. Loaded from JSON (camelCase keys); any key may be omitted.

use crate::error::ReflowError;
use crate::model::TEXT_LINE_CODE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How windows are rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReflowMode {
    /// Merge with a single space, then re-wrap to the configured bound.
    #[default]
    Reflow,
    /// Merge with no separator into one line and stop there.
    Collapse,
}

/// Which width oracle backs pixel-mode wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MeasureConfig {
    /// A TrueType/OpenType font file.
    #[serde(rename_all = "camelCase")]
    Font {
        family: String,
        size_px: u32,
        path: PathBuf,
    },
    /// Fixed width per display cell; full-width glyphs take two cells.
    #[serde(rename_all = "camelCase")]
    Monospace { cell_width_px: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflowConfig {
    pub mode: ReflowMode,
    pub text_line_code: i64,
    pub max_chars: usize,
    pub max_width_px: u32,
    pub max_lines_per_window: usize,
    pub padding_char: char,
    pub sentence_terminal_punctuation: String,
    /// The char wrapper never breaks inside a segment ending on one of these.
    pub break_punctuation: String,
    pub connective_words: Vec<String>,
    pub open_quote_char: char,
    pub close_quote_char: char,
    pub ellipsis_chars: String,
    /// Regexes; a non-first line matching any of them starts a new message.
    pub boundary_patterns: Vec<String>,
    /// Lines no longer than this (and not opening a quote) start a new message.
    pub short_line_chars: Option<usize>,
    /// Absent means char-count wrapping.
    pub measure: Option<MeasureConfig>,
}

/// Identifier-like text, an escape token, or a line opening a new
/// bracket, quote, or bullet.
pub const DEFAULT_BOUNDARY_PATTERNS: &[&str] = &[
    r"^[\w-]+$",
    r"^\\\w+(\[[^\]]*\])?$",
    r"^\s*[\\「【（・]",
];

pub const DEFAULT_CONNECTIVE_WORDS: &[&str] = &["a", "the", "if", "of", "in", "at", "to", "on"];

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            mode: ReflowMode::Reflow,
            text_line_code: TEXT_LINE_CODE,
            max_chars: 60,
            max_width_px: 800,
            max_lines_per_window: 4,
            padding_char: '\u{3000}',
            sentence_terminal_punctuation: ".!?;。！？".to_string(),
            break_punctuation: ".,!?;:".to_string(),
            connective_words: DEFAULT_CONNECTIVE_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            open_quote_char: '「',
            close_quote_char: '」',
            ellipsis_chars: "…".to_string(),
            boundary_patterns: DEFAULT_BOUNDARY_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            short_line_chars: None,
            measure: None,
        }
    }
}

impl ReflowConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ReflowError> {
        let config: ReflowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ReflowError> {
        let json = std::fs::read_to_string(path).map_err(|e| ReflowError::io(path, e))?;
        Self::from_json(json.trim_start_matches('\u{feff}'))
    }

    /// Reject configurations that could never terminate or never match.
    pub fn validate(&self) -> Result<(), ReflowError> {
        if self.max_chars == 0 {
            return Err(ReflowError::Config("maxChars must be at least 1".into()));
        }
        if self.max_width_px == 0 {
            return Err(ReflowError::Config("maxWidthPx must be at least 1".into()));
        }
        if self.max_lines_per_window == 0 {
            return Err(ReflowError::Config(
                "maxLinesPerWindow must be at least 1".into(),
            ));
        }
        if self.connective_words.iter().any(|w| w.trim().is_empty()) {
            return Err(ReflowError::Config(
                "connectiveWords must not contain blank entries".into(),
            ));
        }
        for pattern in &self.boundary_patterns {
            regex_lite::Regex::new(pattern).map_err(|e| {
                ReflowError::Config(format!("boundary pattern {pattern:?} is invalid: {e}"))
            })?;
        }
        match &self.measure {
            Some(MeasureConfig::Font { size_px: 0, .. }) => {
                Err(ReflowError::Config("font sizePx must be at least 1".into()))
            }
            Some(MeasureConfig::Monospace { cell_width_px: 0 }) => Err(ReflowError::Config(
                "monospace cellWidthPx must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn is_terminal(&self, ch: char) -> bool {
        self.sentence_terminal_punctuation.contains(ch)
    }

    pub fn is_ellipsis(&self, ch: char) -> bool {
        self.ellipsis_chars.contains(ch)
    }
}
