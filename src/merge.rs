//! # Paragraph Merger
//!
//! Joins the lines of one window into a single normalized string. Each line
//! loses the spaces, padding glyphs, and line terminators around it before
//! joining, so pre-wrapped input and previously reflowed output (with its
//! continuation padding) normalize to the same paragraph.

use crate::config::ReflowConfig;
use crate::model::{NormalizedParagraph, Window};

/// What goes between merged lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Pure unwrap: lines are concatenated as-is.
    None,
    /// Merge-then-rewrap: lines are joined with one space and short runs of
    /// spacing between words are collapsed.
    Space,
}

pub struct Merger<'a> {
    config: &'a ReflowConfig,
}

impl<'a> Merger<'a> {
    pub fn new(config: &'a ReflowConfig) -> Self {
        Self { config }
    }

    pub fn merge(&self, window: &Window, separator: Separator) -> NormalizedParagraph {
        let pieces: Vec<String> = window
            .lines
            .iter()
            .map(|line| self.clean_line(&line.text))
            .filter(|piece| !piece.is_empty())
            .collect();

        let text = match separator {
            Separator::None => pieces.concat(),
            Separator::Space => collapse_spacing(&pieces.join(" "), self.config.padding_char),
        };
        let found_quote = text.chars().take(2).any(|c| c == self.config.open_quote_char);

        NormalizedParagraph {
            text,
            indent: window.indent(),
            found_quote,
            origin: window.range(),
        }
    }

    /// Trim one raw line, keeping an ellipsis visually spaced from whatever
    /// follows once the line break is gone.
    fn clean_line(&self, raw: &str) -> String {
        let pad = self.config.padding_char;
        let mut line = raw
            .trim_end_matches([' ', pad, '\r', '\n'])
            .trim_start_matches([' ', pad])
            .to_string();
        if line.chars().last().is_some_and(|c| self.config.is_ellipsis(c)) {
            line.push(pad);
        }
        line
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ends_word(c: char) -> bool {
    is_word_char(c) || "-=+….,:;!?".contains(c)
}

/// Replace runs of one or two spaces/padding glyphs with a single space when
/// they sit between a word (or its trailing punctuation) and a following
/// word character. Longer runs are deliberate layout and stay.
pub fn collapse_spacing(text: &str, pad: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    let is_space = |c: char| c == ' ' || c == pad;
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if !is_space(chars[i]) {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && is_space(chars[i]) {
            i += 1;
        }
        let run = &chars[start..i];
        let after_word = start > 0 && ends_word(chars[start - 1]);
        let before_word = chars.get(i).is_some_and(|&c| is_word_char(c));
        if run.len() <= 2 && after_word && before_word {
            out.push(' ');
        } else {
            out.extend(run);
        }
    }
    out
}
