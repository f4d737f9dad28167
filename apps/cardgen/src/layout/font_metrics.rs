//! Font loading and text measurement.
//!
//! `FontBook` is the single font handle of a run: built once at startup from a
//! candidate list and shared by every card. When no candidate loads, it keeps
//! working on built-in approximate metrics so layout stays deterministic and
//! rendering degrades instead of failing.
//!
//! A loaded face is kept twice: as an `ab_glyph` face for measurement and
//! glyph lookup, and as raw font data for the rasterizer.
//!
//! Built-in widths are in em units (relative to font size): ASCII from a
//! humanist sans table, wide East Asian characters at a full 1.0 em.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};
use tracing::{info, warn};
use vello_cpu::peniko::{Blob, FontData};

/// Measures rendered text width in pixels.
pub trait TextMeasure: Send + Sync {
    fn measure(&self, text: &str, size_px: f32) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// FontBook
// ────────────────────────────────────────────────────────────────────────────

pub struct FontBook {
    face: Option<FontVec>,
    data: Option<FontData>,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("source", &self.source)
            .field("fallback", &self.face.is_none())
            .finish()
    }
}

impl FontBook {
    /// Tries each candidate in order and keeps the first font that parses.
    /// Falls back to built-in metrics with a warning when none does.
    pub fn load(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match load_face(path) {
                Ok((face, data)) => {
                    info!(font = %path.display(), "Loaded card font");
                    return Self {
                        face: Some(face),
                        data: Some(data),
                        source: Some(path.clone()),
                    };
                }
                Err(reason) => {
                    warn!(font = %path.display(), %reason, "Font candidate could not be loaded");
                }
            }
        }

        warn!(
            candidates = candidates.len(),
            "No CJK font found; text is laid out with built-in metrics and drawn as placeholder boxes"
        );
        Self::fallback()
    }

    /// A book with no font face, using built-in metrics only.
    pub fn fallback() -> Self {
        Self {
            face: None,
            data: None,
            source: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.face.is_none()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn face(&self) -> Option<&FontVec> {
        self.face.as_ref()
    }

    /// Raw font data for the rasterizer, present exactly when `face` is.
    pub fn glyph_data(&self) -> Option<&FontData> {
        self.data.as_ref()
    }

    /// Distance from the top of a text line to its baseline.
    pub fn ascent(&self, size_px: f32) -> f32 {
        match &self.face {
            Some(face) => face.as_scaled(em_scale(face, size_px)).ascent(),
            None => size_px * FALLBACK_ASCENT_EM,
        }
    }
}

impl TextMeasure for FontBook {
    fn measure(&self, text: &str, size_px: f32) -> f32 {
        match &self.face {
            Some(face) => measure_face(face, text, size_px),
            None => text.chars().map(fallback_char_em).sum::<f32>() * size_px,
        }
    }
}

fn load_face(path: &Path) -> Result<(FontVec, FontData), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // Collections (.ttc) are read at face 0, which is the regular weight for every candidate.
    let face = FontVec::try_from_vec_and_index(bytes.clone(), 0).map_err(|e| e.to_string())?;
    Ok((face, FontData::new(Blob::from(bytes), 0)))
}

/// Scale at which one em equals `size_px` pixels.
pub fn em_scale(face: &FontVec, size_px: f32) -> PxScale {
    let units_per_em = face.units_per_em().unwrap_or(1000.0);
    PxScale::from(size_px * face.height_unscaled() / units_per_em)
}

fn measure_face(face: &FontVec, text: &str, size_px: f32) -> f32 {
    let scaled = face.as_scaled(em_scale(face, size_px));
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in metrics
// ────────────────────────────────────────────────────────────────────────────

const FALLBACK_ASCENT_EM: f32 = 0.88;
/// Width of any non-ASCII, non-wide character.
const FALLBACK_AVERAGE_EM: f32 = 0.52;
const FALLBACK_WIDE_EM: f32 = 1.0;

/// `ASCII_WIDTHS[i]` = width of ASCII character `(i + 32)`, 0x20 through 0x7E.
#[rustfmt::skip]
static ASCII_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0     1     2     3     4     5     6     7     8     9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A     B     C     D     E     F     G     H     I     J     K     L     M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a     b     c     d     e     f     g     h     i     j     k     l     m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n     o     p     q     r     s     t     u     v     w     x     y     z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

fn fallback_char_em(c: char) -> f32 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        ASCII_WIDTHS[(code - 0x20) as usize]
    } else if c.is_control() {
        0.0
    } else if is_wide(code) {
        FALLBACK_WIDE_EM
    } else {
        FALLBACK_AVERAGE_EM
    }
}

/// East Asian wide / fullwidth blocks plus emoji.
fn is_wide(code: u32) -> bool {
    matches!(
        code,
        0x1100..=0x115F
            | 0x2E80..=0x303F
            | 0x3040..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7AF
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1FAFF
            | 0x20000..=0x3FFFD
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measure_empty_is_zero() {
        let book = FontBook::fallback();
        assert_eq!(book.measure("", 46.0), 0.0);
    }

    #[test]
    fn test_fallback_cjk_is_one_em() {
        let book = FontBook::fallback();
        let width = book.measure("重點一", 46.0);
        assert!((width - 138.0).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_fallback_fullwidth_punctuation_is_wide() {
        let book = FontBook::fallback();
        assert!((book.measure("，", 10.0) - 10.0).abs() < 1e-4);
        assert!((book.measure("：", 10.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_fallback_ascii_uses_table() {
        let book = FontBook::fallback();
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00 em
        let width = book.measure("Rust", 10.0);
        assert!((width - 20.0).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_fallback_other_symbols_use_average() {
        let book = FontBook::fallback();
        assert!((book.measure("•", 100.0) - 52.0).abs() < 1e-3);
        assert!((book.measure("…", 100.0) - 52.0).abs() < 1e-3);
    }

    #[test]
    fn test_load_with_no_usable_candidate_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-a-font.ttf");
        std::fs::write(&bogus, b"definitely not a font").unwrap();

        let book = FontBook::load(&[dir.path().join("missing.ttc"), bogus]);
        assert!(book.is_fallback());
        assert!(book.source().is_none());
        assert!(book.glyph_data().is_none());
        assert!(book.measure("字", 20.0) > 0.0);
    }

    #[test]
    fn test_fallback_ascent_scales_with_size() {
        let book = FontBook::fallback();
        assert!(book.ascent(100.0) > book.ascent(50.0));
    }
}
