//! Greedy line breaking bounded by rendered pixel width.
//!
//! Tokens are appended to the current line until the next one would push it
//! past `max_width`. Two refinements over plain greedy filling:
//!
//! - **Connective lookahead.** When the next token is a connective word and
//!   the current token plus that connective would overflow, the current token
//!   is moved down so the pair starts the next line together. After any
//!   break, a connective left dangling at the end of the finished line is
//!   carried down too, provided it fits there.
//! - **Oversize tokens.** A token wider than the whole line cannot be placed
//!   at a space. It gets a line of its own and is cut character by character
//!   by re-running the wrapper in [`WrapMode::Char`].

use super::{split_trailing_connective, ConnectiveWords, WrapMode};
use crate::measure::TextMeasure;

pub struct PixelWrapper<'a, M: TextMeasure + ?Sized> {
    measure: &'a M,
    max_width: u32,
    connectives: &'a ConnectiveWords,
}

/// The line being filled.
struct Accumulator {
    text: String,
    tokens: usize,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            text: String::new(),
            tokens: 0,
        }
    }

    fn starting_with(text: String, tokens: usize) -> Self {
        Self { text, tokens }
    }

    fn joined(&self, token: &str, spacer: &str) -> String {
        if self.tokens == 0 {
            token.to_string()
        } else {
            format!("{}{}{}", self.text, spacer, token)
        }
    }
}

impl<'a, M: TextMeasure + ?Sized> PixelWrapper<'a, M> {
    pub fn new(measure: &'a M, max_width: u32, connectives: &'a ConnectiveWords) -> Self {
        Self {
            measure,
            max_width,
            connectives,
        }
    }

    /// Break a normalized paragraph into lines no wider than `max_width`.
    ///
    /// Every returned line fits, except one made of a single character that
    /// is itself wider than the bound.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        self.wrap_with(text, WrapMode::Word)
    }

    fn fits(&self, text: &str) -> bool {
        self.measure.measure(text) <= self.max_width
    }

    fn wrap_with(&self, text: &str, mode: WrapMode) -> Vec<String> {
        let spacer = mode.spacer();
        let tokens = mode.tokenize(text);
        let mut lines = Vec::new();
        let mut acc = Accumulator::new();

        for (i, &token) in tokens.iter().enumerate() {
            let next = tokens.get(i + 1).copied();

            if mode == WrapMode::Word && !self.fits(token) {
                if acc.tokens > 0 {
                    lines.push(std::mem::take(&mut acc.text));
                }
                let mut pieces = self.wrap_with(token, WrapMode::Char);
                let last = pieces.pop().unwrap_or_default();
                lines.append(&mut pieces);
                acc = Accumulator::starting_with(last, 1);
                continue;
            }

            let candidate = acc.joined(token, spacer);
            let overflow = !self.fits(&candidate);
            let connective_ahead = mode == WrapMode::Word
                && next.is_some_and(|n| {
                    self.connectives.matches(n)
                        && !self.fits(&format!("{candidate}{spacer}{n}"))
                });

            if acc.tokens > 0 && (overflow || connective_ahead) {
                acc = self.break_before(&mut lines, acc, token, mode);
            } else {
                acc = Accumulator::starting_with(candidate, acc.tokens + 1);
            }
        }

        if acc.tokens > 0 {
            lines.push(acc.text);
        }
        lines
    }

    /// Finish the current line and start the next one with `token`.
    ///
    /// In word mode, connectives at the end of the finished line travel down
    /// with `token` for as long as the new line still fits.
    fn break_before(
        &self,
        lines: &mut Vec<String>,
        acc: Accumulator,
        token: &str,
        mode: WrapMode,
    ) -> Accumulator {
        let mut head = acc.text.as_str();
        let mut next = Accumulator::starting_with(token.to_string(), 1);

        if mode == WrapMode::Word {
            while let Some((rest, connective)) = split_trailing_connective(head, self.connectives)
            {
                let carried = format!("{connective} {}", next.text);
                if !self.fits(&carried) {
                    break;
                }
                head = rest;
                next = Accumulator::starting_with(carried, next.tokens + 1);
            }
        }

        lines.push(head.to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONNECTIVE_WORDS;
    use crate::measure::MonospaceMeasure;

    fn wrap(text: &str, max_width: u32) -> Vec<String> {
        let measure = MonospaceMeasure::new(10);
        let connectives = ConnectiveWords::new(DEFAULT_CONNECTIVE_WORDS);
        PixelWrapper::new(&measure, max_width, &connectives).wrap(text)
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap("Hello there", 200), vec!["Hello there"]);
    }

    #[test]
    fn test_breaks_at_space() {
        assert_eq!(
            wrap("alpha beta gamma delta", 110),
            vec!["alpha beta", "gamma delta"]
        );
    }

    #[test]
    fn test_exact_fit_is_not_overflow() {
        // "alpha beta" is exactly 100px.
        assert_eq!(wrap("alpha beta", 100), vec!["alpha beta"]);
    }

    #[test]
    fn test_oversize_token_is_char_split() {
        let lines = wrap("Supercalifragilisticexpialidocious", 100);
        assert_eq!(
            lines,
            vec!["Supercalif", "ragilistic", "expialidoc", "ious"]
        );
    }

    #[test]
    fn test_oversize_token_flushes_accumulator_first() {
        let lines = wrap("so Supercalifragilisticexpialidocious ok", 100);
        assert_eq!(
            lines,
            vec!["so", "Supercalif", "ragilistic", "expialidoc", "ious ok"]
        );
    }

    #[test]
    fn test_connective_lookahead_keeps_pair_together() {
        // "see you at" fits and "see you at the" does not, so "at" moves
        // down next to "the".
        let lines = wrap("see you at the shop", 110);
        assert_eq!(lines, vec!["see you", "at the shop"]);
    }

    #[test]
    fn test_trailing_connectives_are_carried() {
        // Plain greedy filling gives "I walked to the" / "harbour".
        let lines = wrap("I walked to the harbour", 150);
        assert_eq!(lines, vec!["I walked", "to the harbour"]);
    }

    #[test]
    fn test_connective_stays_when_carrying_overflows() {
        // "to the harbour" would be 140px, over the 130px bound.
        let lines = wrap("I walked to the harbour", 130);
        assert_eq!(lines, vec!["I walked", "to", "the harbour"]);
    }

    #[test]
    fn test_every_line_within_bound() {
        let text = "I wonder if the old man at the shop will remember me after all these years";
        let measure = MonospaceMeasure::new(10);
        for line in wrap(text, 200) {
            assert!(measure.measure(&line) <= 200, "{line:?} too wide");
        }
    }

    #[test]
    fn test_content_preserved() {
        let text = "I wonder if the old man at the shop will remember me after all these years";
        assert_eq!(wrap(text, 170).join(" "), text);
    }

    #[test]
    fn test_single_char_wider_than_bound_terminates() {
        assert_eq!(wrap("ab", 5), vec!["a", "b"]);
    }
}
