//! Font-backed width oracle.
//!
//! Parsing a font and walking its character map is far too slow to repeat per
//! measurement, so a [`FontMeasure`] is opened once per batch: it reads the
//! file, picks the face whose family matches, pre-computes every advance
//! width, and then answers queries from memory. Dropping it releases the
//! font data.

use super::TextMeasure;
use crate::error::ReflowError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Advance widths of one font face at one pixel size.
pub struct FontMeasure {
    family: String,
    size_px: u32,
    units_per_em: u16,
    advance_widths: HashMap<char, u16>,
    /// Advance of the `.notdef` glyph, used for characters the face lacks.
    default_advance: u16,
    source: PathBuf,
}

impl FontMeasure {
    /// Open `path` and select the face named `family`.
    ///
    /// Font collections (`.ttc`) are searched face by face. Family names are
    /// compared case-insensitively against every family name record, so both
    /// the English and the localized name of a face match.
    pub fn open(path: &Path, family: &str, size_px: u32) -> Result<Self, ReflowError> {
        let data = std::fs::read(path)
            .map_err(|e| ReflowError::Font(format!("cannot read {}: {e}", path.display())))?;
        let mut measure = Self::from_font_data(&data, family, size_px)?;
        measure.source = path.to_path_buf();
        debug!(family, size_px, path = %path.display(), "opened font metrics");
        Ok(measure)
    }

    /// Build metrics from in-memory font bytes.
    pub fn from_font_data(data: &[u8], family: &str, size_px: u32) -> Result<Self, ReflowError> {
        let face_count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
        let mut seen = Vec::new();

        for index in 0..face_count {
            let face = match ttf_parser::Face::parse(data, index) {
                Ok(face) => face,
                Err(e) => {
                    if face_count == 1 {
                        return Err(ReflowError::Font(format!("cannot parse font: {e}")));
                    }
                    continue;
                }
            };
            let names = family_names(&face);
            if names.iter().any(|n| n.eq_ignore_ascii_case(family)) {
                return Ok(Self::from_face(&face, family, size_px));
            }
            seen.extend(names);
        }

        Err(ReflowError::Font(format!(
            "no face named {family:?} in font (found: {})",
            if seen.is_empty() {
                "none".to_string()
            } else {
                seen.join(", ")
            }
        )))
    }

    fn from_face(face: &ttf_parser::Face<'_>, family: &str, size_px: u32) -> Self {
        let units_per_em = face.units_per_em();
        let mut advance_widths = HashMap::new();

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                }
            }
        }

        let default_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .unwrap_or(units_per_em / 2);

        Self {
            family: family.to_string(),
            size_px,
            units_per_em,
            advance_widths,
            default_advance,
            source: PathBuf::new(),
        }
    }

    fn advance(&self, ch: char) -> u16 {
        self.advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance)
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str) -> u32 {
        let units: u64 = text.chars().map(|ch| self.advance(ch) as u64).sum();
        let upem = self.units_per_em.max(1) as u64;
        ((units * self.size_px as u64 + upem / 2) / upem) as u32
    }
}

impl Drop for FontMeasure {
    fn drop(&mut self) {
        debug!(
            family = %self.family,
            size_px = self.size_px,
            path = %self.source.display(),
            "released font metrics"
        );
    }
}

fn family_names(face: &ttf_parser::Face<'_>) -> Vec<String> {
    face.names()
        .into_iter()
        .filter(|name| {
            name.name_id == ttf_parser::name_id::FAMILY
                || name.name_id == ttf_parser::name_id::TYPOGRAPHIC_FAMILY
        })
        .filter_map(|name| name.to_string())
        .collect()
}
