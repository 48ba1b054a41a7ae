//! # Message Window Detection
//!
//! Finds the run of consecutive text-line records that make up one on-screen
//! message. A window grows from its first line until one of these happens:
//!
//! - the configured maximum number of records is reached,
//! - a record is not a single-text text line (other commands and
//!   multi-parameter records are left alone),
//! - a later line looks like the start of a different message,
//! - a line ends in sentence-terminal punctuation (that line is included),
//!   unless the next line starts with the padding glyph.
//!
//! A line starting with the padding glyph continues quoted speech from the
//! line above and is never taken for the start of a new message.
//! Blank text lines inside a window are covered by it but contribute no text.
//! A blank first line yields an empty window.
//!
//! What counts as "the start of a different message" is a heuristic and
//! varies between games, so it sits behind [`BoundaryHeuristic`].

use crate::config::ReflowConfig;
use crate::error::ReflowError;
use crate::model::{Command, RawLine, Window};
use regex_lite::Regex;

/// Decides whether a non-first line opens a new message.
pub trait BoundaryHeuristic {
    fn starts_new_message(&self, text: &str) -> bool;
}

/// Regex-driven boundary rule built from the configuration.
///
/// Fires when any pattern matches, or, with `short_line_chars` set, when the
/// line is already short and does not open a quote.
pub struct PatternBoundary {
    patterns: Vec<Regex>,
    short_line_chars: Option<usize>,
    open_quote_char: char,
}

impl PatternBoundary {
    pub fn from_config(config: &ReflowConfig) -> Result<Self, ReflowError> {
        let patterns = config
            .boundary_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    ReflowError::Config(format!("boundary pattern {p:?} is invalid: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            short_line_chars: config.short_line_chars,
            open_quote_char: config.open_quote_char,
        })
    }
}

impl BoundaryHeuristic for PatternBoundary {
    fn starts_new_message(&self, text: &str) -> bool {
        if self.patterns.iter().any(|re| re.is_match(text)) {
            return true;
        }
        match self.short_line_chars {
            Some(limit) => {
                let body = text.trim_start();
                !body.starts_with(self.open_quote_char) && body.chars().count() <= limit
            }
            None => false,
        }
    }
}

/// A heuristic that never fires; windows are bounded only by length, record
/// kind, and punctuation.
pub struct NoBoundary;

impl BoundaryHeuristic for NoBoundary {
    fn starts_new_message(&self, _text: &str) -> bool {
        false
    }
}

pub struct Detector<'a> {
    config: &'a ReflowConfig,
    boundary: &'a dyn BoundaryHeuristic,
}

impl<'a> Detector<'a> {
    pub fn new(config: &'a ReflowConfig, boundary: &'a dyn BoundaryHeuristic) -> Self {
        Self { config, boundary }
    }

    /// Collect the window starting at `start`.
    ///
    /// An empty window means the record at `start` cannot open a message;
    /// the caller moves on by one.
    pub fn scan(&self, commands: &[Command], start: usize) -> Window {
        let mut window = Window::empty(start);
        let mut covered = 0;
        let mut closed = false;

        while covered < self.config.max_lines_per_window {
            let text = match self.classify(commands.get(start + covered)) {
                Candidate::Stop => {
                    closed = true;
                    break;
                }
                Candidate::Blank => {
                    if covered == 0 {
                        break;
                    }
                    covered += 1;
                    continue;
                }
                Candidate::Line(text) => text,
            };
            if covered > 0 && !self.is_continuation(text) && self.boundary.starts_new_message(text)
            {
                closed = true;
                break;
            }

            window.lines.push(RawLine {
                text: text.to_string(),
                sequence_index: start + covered,
                indent: commands[start + covered].indent,
            });
            covered += 1;

            if self.ends_sentence(text) && !self.continues_at(commands, start + covered) {
                closed = true;
                break;
            }
        }

        if window.lines.is_empty() {
            return Window::empty(start);
        }
        window.span = covered;
        window.truncated = !closed && self.message_goes_on(commands, start + covered);
        window
    }

    fn classify<'c>(&self, command: Option<&'c Command>) -> Candidate<'c> {
        let Some(command) = command else {
            return Candidate::Stop;
        };
        if command.code != self.config.text_line_code {
            return Candidate::Stop;
        }
        match command.single_text() {
            None => Candidate::Stop,
            Some(text) if self.is_blank(text) => Candidate::Blank,
            Some(text) => Candidate::Line(text),
        }
    }

    /// A padded line continues quoted speech wrapped onto the line above.
    fn is_continuation(&self, text: &str) -> bool {
        text.starts_with(self.config.padding_char)
    }

    fn continues_at(&self, commands: &[Command], index: usize) -> bool {
        matches!(
            self.classify(commands.get(index)),
            Candidate::Line(text) if self.is_continuation(text)
        )
    }

    /// Whether the first non-blank record from `index` on would have joined
    /// the window had the line limit not been reached.
    fn message_goes_on(&self, commands: &[Command], mut index: usize) -> bool {
        loop {
            match self.classify(commands.get(index)) {
                Candidate::Stop => return false,
                Candidate::Blank => index += 1,
                Candidate::Line(text) => {
                    return self.is_continuation(text) || !self.boundary.starts_new_message(text)
                }
            }
        }
    }

    fn trim_end<'t>(&self, text: &'t str) -> &'t str {
        text.trim_end_matches([' ', self.config.padding_char, '\r', '\n'])
    }

    fn is_blank(&self, text: &str) -> bool {
        self.trim_end(text)
            .trim_start_matches([' ', self.config.padding_char])
            .is_empty()
    }

    fn ends_sentence(&self, text: &str) -> bool {
        self.trim_end(text)
            .chars()
            .last()
            .is_some_and(|c| self.config.is_terminal(c))
    }
}

enum Candidate<'c> {
    /// Not a single-text text line; closes the window.
    Stop,
    Blank,
    Line(&'c str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TEXT_LINE_CODE;
    use serde_json::json;

    fn line(text: &str) -> Command {
        Command::text_line(TEXT_LINE_CODE, text, 0)
    }

    fn texts(window: &Window) -> Vec<&str> {
        window.lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn scan(commands: &[Command], start: usize) -> Window {
        let cfg = ReflowConfig::default();
        let boundary = PatternBoundary::from_config(&cfg).unwrap();
        Detector::new(&cfg, &boundary).scan(commands, start)
    }

    #[test]
    fn test_window_closes_after_terminal_punctuation() {
        let cmds = vec![
            line("Hello there,"),
            line("how are you"),
            line("today?"),
            line("Fine"),
        ];
        let w = scan(&cmds, 0);
        assert_eq!(texts(&w), vec!["Hello there,", "how are you", "today?"]);
        assert_eq!(w.range(), 0..3);
    }

    #[test]
    fn test_window_capped_at_max_lines() {
        let cmds: Vec<Command> = (0..6).map(|i| line(&format!("part {i} of it"))).collect();
        let w = scan(&cmds, 1);
        assert_eq!(w.len(), 4);
        assert_eq!(w.range(), 1..5);
        assert_eq!(w.lines[0].sequence_index, 1);
        assert!(w.truncated);
    }

    #[test]
    fn test_cap_at_end_of_message_is_not_truncated() {
        let cmds = vec![
            line("part one"),
            line("part two"),
            line("part three"),
            line("part four"),
            line("「Next」"),
        ];
        let w = scan(&cmds, 0);
        assert_eq!(w.len(), 4);
        assert!(!w.truncated);
    }

    #[test]
    fn test_truncation_looks_past_blank_lines() {
        let cmds = vec![
            line("part one"),
            line("part two"),
            line("part three"),
            line("part four"),
            line(""),
            line("part five"),
        ];
        assert!(scan(&cmds, 0).truncated);
    }

    #[test]
    fn test_padded_line_keeps_window_open_after_sentence_end() {
        let cmds = vec![
            line("「Hi there."),
            line("\u{3000}How are you"),
            line("\u{3000}today」"),
            line("Next"),
        ];
        let w = scan(&cmds, 0);
        assert_eq!(w.span, 3);
        assert!(!w.truncated);
    }

    #[test]
    fn test_padded_line_bypasses_boundary_rule() {
        let cfg = ReflowConfig {
            short_line_chars: Some(10),
            ..Default::default()
        };
        let boundary = PatternBoundary::from_config(&cfg).unwrap();
        let cmds = vec![line("「I wonder if"), line("\u{3000}doing")];
        let w = Detector::new(&cfg, &boundary).scan(&cmds, 0);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn test_identifier_line_starts_new_message() {
        let cmds = vec![line("Hello there"), line("actor_01")];
        let w = scan(&cmds, 0);
        assert_eq!(texts(&w), vec!["Hello there"]);
        assert_eq!(w.span, 1);
    }

    #[test]
    fn test_quote_opener_starts_new_message() {
        let cmds = vec![line("「Hi"), line("「Bye」")];
        assert_eq!(scan(&cmds, 0).len(), 1);
    }

    #[test]
    fn test_boundary_ignored_for_first_line() {
        let cmds = vec![line("\\N[1]"), line("walks in")];
        let w = scan(&cmds, 0);
        assert_eq!(texts(&w), vec!["\\N[1]", "walks in"]);
    }

    #[test]
    fn test_other_commands_close_window() {
        let cmds = vec![
            line("one line"),
            serde_json::from_value(json!({"code": 101, "indent": 0, "parameters": ["", 0, 0, 2]}))
                .unwrap(),
            line("next box"),
        ];
        assert_eq!(scan(&cmds, 0).span, 1);
        assert!(scan(&cmds, 1).is_empty());
    }

    #[test]
    fn test_multi_parameter_text_line_closes_window() {
        let odd: Command = serde_json::from_value(
            json!({"code": 401, "indent": 0, "parameters": ["a", "b"]}),
        )
        .unwrap();
        let cmds = vec![line("first"), odd];
        assert_eq!(scan(&cmds, 0).span, 1);
    }

    #[test]
    fn test_blank_lines_skipped_inside_window() {
        let cmds = vec![line("so then"), line(""), line("we left")];
        let w = scan(&cmds, 0);
        assert_eq!(texts(&w), vec!["so then", "we left"]);
        assert_eq!(w.span, 3);
    }

    #[test]
    fn test_blank_first_line_is_empty_window() {
        let cmds = vec![line("\u{3000}"), line("text")];
        let w = scan(&cmds, 0);
        assert!(w.is_empty());
        assert_eq!(w.span, 0);
    }

    #[test]
    fn test_short_line_rule_is_opt_in() {
        let cfg = ReflowConfig {
            short_line_chars: Some(10),
            ..Default::default()
        };
        let boundary = PatternBoundary::from_config(&cfg).unwrap();
        assert!(boundary.starts_new_message("ok then"));
        assert!(!boundary.starts_new_message("「ok then"));
        assert!(!boundary.starts_new_message("this one is rather long"));
    }

    #[test]
    fn test_no_boundary_heuristic() {
        let cfg = ReflowConfig::default();
        let cmds = vec![line("Hello there"), line("actor_01")];
        let w = Detector::new(&cfg, &NoBoundary).scan(&cmds, 0);
        assert_eq!(w.len(), 2);
    }
}
