//! # Line Wrapping
//!
//! Two strategies split a normalized paragraph back into display lines:
//!
//! - [`pixel`]: greedy, bounded by rendered width from a width oracle.
//! - [`chars`]: bounded by character count, for when no oracle exists.
//!
//! Both avoid ending a line on a short connective word ("a", "the", "of",
//! ...) when the word could travel to the next line instead.

pub mod chars;
pub mod pixel;

pub use chars::CharWrapper;
pub use pixel::PixelWrapper;

/// How a paragraph is cut into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Split on single spaces; lines are rejoined with a space.
    Word,
    /// Every character is a token; lines are rejoined with nothing.
    Char,
}

impl WrapMode {
    pub fn spacer(self) -> &'static str {
        match self {
            WrapMode::Word => " ",
            WrapMode::Char => "",
        }
    }

    pub fn tokenize(self, text: &str) -> Vec<&str> {
        match self {
            WrapMode::Word => text.split(' ').collect(),
            WrapMode::Char => text
                .char_indices()
                .map(|(i, ch)| &text[i..i + ch.len_utf8()])
                .collect(),
        }
    }
}

/// Short linking words that should not be stranded at a line end.
#[derive(Debug, Clone, Default)]
pub struct ConnectiveWords {
    words: Vec<String>,
}

impl ConnectiveWords {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Whether `token` is exactly a connective, ignoring ASCII case.
    pub fn matches(&self, token: &str) -> bool {
        !token.is_empty() && self.words.iter().any(|w| w.eq_ignore_ascii_case(token))
    }

    /// The connective that `segment` ends with as a whole word, if any.
    ///
    /// Returns the character length of the matched word.
    pub fn trailing(&self, segment: &str, break_char: char) -> Option<usize> {
        let last = segment.rsplit(break_char).next()?;
        if last.len() == segment.len() {
            return None;
        }
        self.words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(last))
            .then_some(last.chars().count())
    }
}

/// Split `line` into its leading words and a trailing connective, when the
/// line has more than one word and ends with one.
pub(crate) fn split_trailing_connective<'a>(
    line: &'a str,
    connectives: &ConnectiveWords,
) -> Option<(&'a str, &'a str)> {
    let (head, last) = line.rsplit_once(' ')?;
    if head.trim().is_empty() || !connectives.matches(last) {
        return None;
    }
    Some((head, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connectives() -> ConnectiveWords {
        ConnectiveWords::new(&["a", "the", "of", "to"])
    }

    #[test]
    fn test_tokenize_word_keeps_empty_tokens() {
        assert_eq!(WrapMode::Word.tokenize("a  b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_tokenize_char_handles_multibyte() {
        assert_eq!(WrapMode::Char.tokenize("あa」"), vec!["あ", "a", "」"]);
    }

    #[test]
    fn test_connective_match_is_whole_token() {
        let c = connectives();
        assert!(c.matches("the"));
        assert!(c.matches("The"));
        assert!(!c.matches("to."));
        assert!(!c.matches("theory"));
        assert!(!c.matches("at"));
        assert!(!c.matches("..."));
    }

    #[test]
    fn test_trailing_connective() {
        let c = connectives();
        assert_eq!(c.trailing("walk to the", ' '), Some(3));
        assert_eq!(c.trailing("walk to", ' '), Some(2));
        assert_eq!(c.trailing("the", ' '), None);
        assert_eq!(c.trailing("walk together", ' '), None);
    }

    #[test]
    fn test_split_trailing_connective() {
        let c = connectives();
        assert_eq!(
            split_trailing_connective("went to the", &c),
            Some(("went to", "the"))
        );
        assert_eq!(split_trailing_connective("the", &c), None);
        assert_eq!(split_trailing_connective("went home", &c), None);
    }
}
