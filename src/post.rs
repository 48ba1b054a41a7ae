//! # Quote and Padding Post-Processing
//!
//! Typographic fixes applied to freshly wrapped dialogue before it is written
//! back: a closing quotation mark never sits alone on the last line, and
//! lines continuing a quoted speech are indented by one padding glyph so
//! they align under the text after the opening mark.

use crate::model::WrappedLine;

pub struct PostProcessor {
    pub padding_char: char,
    pub close_quote_char: char,
}

impl PostProcessor {
    pub fn new(padding_char: char, close_quote_char: char) -> Self {
        Self {
            padding_char,
            close_quote_char,
        }
    }

    pub fn apply(&self, lines: Vec<String>, found_quote: bool) -> Vec<WrappedLine> {
        let mut lines = lines;
        self.reattach_close_quote(&mut lines);

        WrappedLine::from_texts(lines)
            .into_iter()
            .map(|mut line| {
                if found_quote && !line.is_first {
                    line.text.insert(0, self.padding_char);
                }
                line
            })
            .collect()
    }

    fn reattach_close_quote(&self, lines: &mut Vec<String>) {
        if lines.len() < 2 {
            return;
        }
        let is_orphan = lines.last().is_some_and(|last| {
            let mut chars = last.chars();
            chars.next() == Some(self.close_quote_char) && chars.next().is_none()
        });
        if is_orphan {
            lines.pop();
            if let Some(prev) = lines.last_mut() {
                prev.push(self.close_quote_char);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[WrappedLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_orphan_close_quote_merged() {
        let pp = PostProcessor::new('\u{3000}', '」');
        let out = pp.apply(vec!["「Hello".into(), "there".into(), "」".into()], false);
        assert_eq!(texts(&out), vec!["「Hello", "there」"]);
    }

    #[test]
    fn test_continuation_padding_when_quoted() {
        let pp = PostProcessor::new('\u{3000}', '」');
        let out = pp.apply(vec!["「Hello".into(), "there」".into()], true);
        assert_eq!(texts(&out), vec!["「Hello", "\u{3000}there」"]);
        assert!(out[0].is_first);
        assert!(!out[1].is_first);
    }

    #[test]
    fn test_no_padding_without_quote() {
        let pp = PostProcessor::new('\u{3000}', '」');
        let out = pp.apply(vec!["a".into(), "b".into()], false);
        assert_eq!(texts(&out), vec!["a", "b"]);
    }

    #[test]
    fn test_lone_quote_line_kept() {
        let pp = PostProcessor::new('\u{3000}', '」');
        let out = pp.apply(vec!["」".into()], false);
        assert_eq!(texts(&out), vec!["」"]);
    }

    #[test]
    fn test_quote_with_other_text_not_merged() {
        let pp = PostProcessor::new('\u{3000}', '」');
        let out = pp.apply(vec!["a".into(), "b」".into()], false);
        assert_eq!(texts(&out), vec!["a", "b」"]);
    }
}
