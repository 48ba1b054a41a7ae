//! Line breaking bounded by character count.
//!
//! Used when no width oracle is configured. Lengths are counted in Unicode
//! scalar values, not bytes.

use super::ConnectiveWords;

pub struct CharWrapper<'a> {
    max_chars: usize,
    /// `None` cuts at exactly `max_chars` with no regard for words.
    break_char: Option<char>,
    break_punctuation: &'a str,
    connectives: &'a ConnectiveWords,
}

impl<'a> CharWrapper<'a> {
    pub fn new(
        max_chars: usize,
        break_char: Option<char>,
        break_punctuation: &'a str,
        connectives: &'a ConnectiveWords,
    ) -> Self {
        Self {
            max_chars: max_chars.max(1),
            break_char,
            break_punctuation,
            connectives,
        }
    }

    /// Split `text` into segments of at most `max_chars` characters.
    ///
    /// Text that already fits comes back as a single unchanged element.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let mut rest: Vec<char> = text.chars().collect();
        let mut lines = Vec::new();

        while rest.len() > self.max_chars {
            let cut = match self.break_char {
                Some(bc) => self.break_point(&rest, bc),
                None => self.max_chars,
            };

            let mut segment = &rest[..cut];
            let mut tail = &rest[cut..];
            if let Some(bc) = self.break_char {
                segment = strip_leading(segment, bc);
                segment = strip_trailing(segment, bc);
                tail = strip_leading(tail, bc);
            }

            lines.push(segment.iter().collect());
            rest = tail.to_vec();
        }

        if lines.is_empty() {
            return vec![text.to_string()];
        }
        if !rest.is_empty() {
            lines.push(rest.into_iter().collect());
        }
        lines
    }

    /// Where to end the next segment of `chars`.
    ///
    /// Prefers the last `break_char` within the bound. Falls back to a hard
    /// cut when that would leave fewer than two characters, or when the
    /// character right at the bound is punctuation. Connectives ending the
    /// segment are pushed to the next one, one at a time, until the segment
    /// would get too short.
    fn break_point(&self, chars: &[char], break_char: char) -> usize {
        let max = self.max_chars;
        let last_break = chars[..max].iter().rposition(|&c| c == break_char);
        let ends_on_punctuation = self.break_punctuation.contains(chars[max - 1]);

        let mut cut = match last_break {
            Some(pos) if pos >= 2 && !ends_on_punctuation => pos,
            _ => max,
        };

        loop {
            let head: String = chars[..cut].iter().collect();
            let head = head.trim_end_matches(break_char);
            let head_len = head.chars().count();
            match self.connectives.trailing(head, break_char) {
                Some(len) if head_len > len + 6 => cut = head_len - len,
                _ => break,
            }
        }
        cut
    }
}

fn strip_leading(chars: &[char], c: char) -> &[char] {
    match chars.split_first() {
        Some((&first, rest)) if first == c => rest,
        _ => chars,
    }
}

fn strip_trailing(chars: &[char], c: char) -> &[char] {
    match chars.split_last() {
        Some((&last, rest)) if last == c => rest,
        _ => chars,
    }
}
