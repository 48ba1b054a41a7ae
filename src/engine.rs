//! # Reflow Engine
//!
//! Drives the pipeline over one command list:
//!
//! ```text
//! commands ──▶ [detect] window ──▶ [merge] paragraph ──▶ [text] wrapped lines
//!                                                              │
//! commands ◀── splice at window bounds ◀── [post] quote/padding fixes
//! ```
//!
//! A window's replacement records are built completely before the list is
//! touched, then swapped in with a single `splice`. A window is never left
//! half rewritten.
//!
//! A message is left as it is, with a warning, when it cannot be rewritten
//! and still read back as the same window on a later pass: the line limit
//! cut it short, or its new lines would not fit in one window.

use crate::config::{ReflowConfig, ReflowMode};
use crate::detect::{BoundaryHeuristic, Detector};
use crate::measure::TextMeasure;
use crate::merge::{Merger, Separator};
use crate::model::{Command, Window};
use crate::post::PostProcessor;
use crate::text::{CharWrapper, ConnectiveWords, PixelWrapper};
use tracing::{debug, warn};

/// What a pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflowReport {
    pub windows_rewritten: usize,
    pub lines_removed: usize,
    pub lines_added: usize,
}

impl ReflowReport {
    pub fn is_modified(&self) -> bool {
        self.windows_rewritten > 0
    }

    pub fn absorb(&mut self, other: ReflowReport) {
        self.windows_rewritten += other.windows_rewritten;
        self.lines_removed += other.lines_removed;
        self.lines_added += other.lines_added;
    }
}

pub struct ReflowEngine<'a> {
    config: &'a ReflowConfig,
    boundary: &'a dyn BoundaryHeuristic,
    /// `None` selects char-count wrapping.
    measure: Option<&'a dyn TextMeasure>,
    connectives: ConnectiveWords,
}

impl<'a> ReflowEngine<'a> {
    pub fn new(
        config: &'a ReflowConfig,
        boundary: &'a dyn BoundaryHeuristic,
        measure: Option<&'a dyn TextMeasure>,
    ) -> Self {
        Self {
            config,
            boundary,
            measure,
            connectives: ConnectiveWords::new(&config.connective_words),
        }
    }

    /// Rewrite every window in `commands` in place.
    pub fn reflow(&self, commands: &mut Vec<Command>) -> ReflowReport {
        let detector = Detector::new(self.config, self.boundary);
        let mut report = ReflowReport::default();
        let mut z = 0;

        while z < commands.len() {
            if commands[z].is_unknown_shape() {
                z += 1;
                continue;
            }
            let window = detector.scan(commands, z);
            if window.is_empty() {
                z += 1;
                continue;
            }

            match self.rewrite(commands, &window) {
                Some(replacement) => {
                    let added = replacement.len();
                    debug!(
                        start = window.start,
                        removed = window.span,
                        added,
                        "rewrote message window"
                    );
                    report.windows_rewritten += 1;
                    report.lines_removed += window.span;
                    report.lines_added += added;
                    commands.splice(window.range(), replacement);
                    z += added.max(1);
                }
                None => z += window.span,
            }
        }

        report
    }

    /// Build the records that replace `window`, or `None` to leave it alone.
    pub fn rewrite(&self, commands: &[Command], window: &Window) -> Option<Vec<Command>> {
        if window.truncated {
            warn!(
                start = window.start,
                limit = self.config.max_lines_per_window,
                "message runs past the line limit; left unchanged"
            );
            return None;
        }
        let merger = Merger::new(self.config);
        let texts = match self.config.mode {
            ReflowMode::Collapse => {
                if window.span < 2 {
                    return None;
                }
                let paragraph = merger.merge(window, Separator::None);
                if paragraph.text.is_empty() {
                    return None;
                }
                vec![paragraph.text]
            }
            ReflowMode::Reflow => {
                if window.len() < 2 && !self.exceeds_bound(&window.lines[0].text) {
                    return None;
                }
                let paragraph = merger.merge(window, Separator::Space);
                if paragraph.text.is_empty() {
                    return None;
                }
                let post = PostProcessor::new(
                    self.config.padding_char,
                    self.config.close_quote_char,
                );
                let lines: Vec<String> = post
                    .apply(self.wrap(&paragraph.text), paragraph.found_quote)
                    .into_iter()
                    .map(|line| line.text)
                    .collect();
                if lines.len() > self.config.max_lines_per_window {
                    warn!(
                        start = window.start,
                        needed = lines.len(),
                        limit = self.config.max_lines_per_window,
                        "rewrapped message does not fit one window; left unchanged"
                    );
                    return None;
                }
                lines
            }
        };

        let original = &commands[window.range()];
        let unchanged = original.len() == texts.len()
            && original
                .iter()
                .zip(&texts)
                .all(|(cmd, text)| cmd.single_text() == Some(text.as_str()));
        if unchanged {
            return None;
        }

        let indent = window.indent();
        Some(
            texts
                .into_iter()
                .map(|text| Command::text_line(self.config.text_line_code, text, indent))
                .collect(),
        )
    }

    /// Split a normalized paragraph with whichever wrapper is configured.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        match self.measure {
            Some(measure) => {
                PixelWrapper::new(measure, self.config.max_width_px, &self.connectives).wrap(text)
            }
            None => CharWrapper::new(
                self.config.max_chars,
                Some(' '),
                &self.config.break_punctuation,
                &self.connectives,
            )
            .wrap(text),
        }
    }

    fn exceeds_bound(&self, text: &str) -> bool {
        match self.measure {
            Some(measure) => measure.measure(text) > self.config.max_width_px,
            None => text.chars().count() > self.config.max_chars,
        }
    }
}
