//! # Width Oracles
//!
//! The pixel wrapper only needs one question answered: how wide does this
//! string render in the message window's font? Anything that can answer it
//! deterministically implements [`TextMeasure`].
//!
//! Two oracles ship with the crate. [`MonospaceMeasure`] counts display
//! cells and is exact for bitmap fonts. [`FontMeasure`] reads real advance
//! widths out of a TrueType/OpenType file.

pub mod font;

pub use font::FontMeasure;

use crate::config::MeasureConfig;
use crate::error::ReflowError;
use unicode_width::UnicodeWidthChar;

/// Rendered pixel width of text in one fixed font configuration.
///
/// Implementations must be pure: the same string always measures the same,
/// and measuring has no side effects.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> u32;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str) -> u32 {
        (**self).measure(text)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn measure(&self, text: &str) -> u32 {
        (**self).measure(text)
    }
}

/// Fixed-pitch oracle: `cell_width_px` per display cell.
///
/// Full-width glyphs (CJK, full-width punctuation, U+3000) occupy two cells.
/// Control characters occupy none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasure {
    pub cell_width_px: u32,
}

impl MonospaceMeasure {
    pub fn new(cell_width_px: u32) -> Self {
        Self { cell_width_px }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> u32 {
        let cells: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
        cells as u32 * self.cell_width_px
    }
}

/// Acquire the oracle a configuration asks for.
///
/// Returns `Ok(None)` when no measurement is configured, in which case the
/// engine falls back to char-count wrapping. A configured font that cannot
/// be opened is an error, never a silent downgrade.
pub fn open(config: Option<&MeasureConfig>) -> Result<Option<Box<dyn TextMeasure>>, ReflowError> {
    match config {
        None => Ok(None),
        Some(MeasureConfig::Monospace { cell_width_px }) => {
            Ok(Some(Box::new(MonospaceMeasure::new(*cell_width_px))))
        }
        Some(MeasureConfig::Font {
            family,
            size_px,
            path,
        }) => Ok(Some(Box::new(FontMeasure::open(path, family, *size_px)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_ascii() {
        let m = MonospaceMeasure::new(10);
        assert_eq!(m.measure("Hello"), 50);
        assert_eq!(m.measure(""), 0);
    }

    #[test]
    fn test_monospace_full_width_counts_double() {
        let m = MonospaceMeasure::new(10);
        assert_eq!(m.measure("「"), 20);
        assert_eq!(m.measure("\u{3000}a"), 30);
    }

    #[test]
    fn test_open_none_is_char_mode() {
        assert!(open(None).unwrap().is_none());
    }

    #[test]
    fn test_open_missing_font_is_error() {
        let cfg = MeasureConfig::Font {
            family: "MS Gothic".into(),
            size_px: 24,
            path: "/nonexistent/msgothic.ttc".into(),
        };
        let err = open(Some(&cfg)).err().unwrap();
        assert!(matches!(err, ReflowError::Font(_)));
    }
}
