//! Fixed 1080×1920 canvas shared by every card of a run, and the few drawing
//! primitives the cards need.
//!
//! Shapes and glyphs are recorded into a `vello_cpu` render context and
//! rasterized once, when the card is encoded.

use std::path::Path;

use ab_glyph::{Font, GlyphId, ScaleFont};
use image::{Rgb, RgbImage};
use vello_cpu::kurbo::{Rect, RoundedRect, Shape};
use vello_cpu::peniko::Color;
use vello_cpu::{Glyph, Pixmap, RenderContext};

use crate::layout::font_metrics::{em_scale, FontBook, TextMeasure};
use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Canvas constants
// ────────────────────────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1920;
/// Outer margin on every side.
pub const MARGIN: f32 = 90.0;
/// Usable text width between the margins.
pub const CONTENT_WIDTH: f32 = CANVAS_WIDTH as f32 - MARGIN * 2.0;
pub const ACCENT_BAR_HEIGHT: f32 = 8.0;

pub const COLOR_BACKGROUND: Rgb<u8> = Rgb([10, 14, 26]);
pub const COLOR_CARD: Rgb<u8> = Rgb([18, 25, 45]);
pub const COLOR_ACCENT: Rgb<u8> = Rgb([52, 199, 142]);
pub const COLOR_WHITE: Rgb<u8> = Rgb([245, 245, 250]);
pub const COLOR_GRAY: Rgb<u8> = Rgb([160, 165, 180]);
pub const COLOR_DIM: Rgb<u8> = Rgb([80, 88, 110]);

pub const FONT_SIZE_BRAND: f32 = 32.0;
pub const FONT_SIZE_CHANNEL: f32 = 38.0;
pub const FONT_SIZE_TITLE: f32 = 68.0;
pub const FONT_SIZE_LABEL: f32 = 36.0;
pub const FONT_SIZE_CONTENT: f32 = 46.0;
pub const FONT_SIZE_FOOTER: f32 = 30.0;
pub const FONT_SIZE_PROGRESS: f32 = 30.0;

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// Flattening tolerance for curved outlines, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

pub struct Canvas {
    ctx: RenderContext,
}

impl Canvas {
    /// A canvas of the fixed card size, filled with the background color.
    pub fn new() -> Self {
        let mut ctx = RenderContext::new(CANVAS_WIDTH as u16, CANVAS_HEIGHT as u16);
        ctx.set_paint(paint(COLOR_BACKGROUND));
        ctx.fill_rect(&Rect::new(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64));
        Self { ctx }
    }

    /// Fills the rectangle spanning `(x0, y0)`–`(x1, y1)`. Off-canvas parts are clipped.
    pub fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
        self.ctx.set_paint(paint(color));
        self.ctx
            .fill_rect(&Rect::new(x0 as f64, y0 as f64, x1 as f64, y1 as f64));
    }

    /// Fills a rectangle whose corners are rounded with `radius`.
    pub fn fill_rounded_rect(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        radius: f32,
        color: Rgb<u8>,
    ) {
        let shape = RoundedRect::new(x0 as f64, y0 as f64, x1 as f64, y1 as f64, radius as f64);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&shape.to_path(PATH_TOLERANCE));
    }

    /// Draws one line of text with its top edge at `top`.
    ///
    /// Without a font face, each visible character becomes an outlined box of
    /// its measured width so the layout stays visible.
    pub fn draw_text(
        &mut self,
        fonts: &FontBook,
        text: &str,
        x: f32,
        top: f32,
        size_px: f32,
        color: Rgb<u8>,
    ) {
        let (Some(face), Some(data)) = (fonts.face(), fonts.glyph_data()) else {
            self.draw_placeholder_text(fonts, text, x, top, size_px, color);
            return;
        };

        // Glyph ids and advances come from the same face the layout measured with.
        let scaled = face.as_scaled(em_scale(face, size_px));
        let baseline = top + fonts.ascent(size_px);
        let mut caret = x;
        let mut previous: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(Glyph {
                id: u32::from(id.0),
                x: caret,
                y: baseline,
            });
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        self.ctx.set_paint(paint(color));
        self.ctx
            .glyph_run(data)
            .font_size(size_px)
            .fill_glyphs(glyphs.into_iter());
    }

    fn draw_placeholder_text(
        &mut self,
        fonts: &FontBook,
        text: &str,
        x: f32,
        top: f32,
        size_px: f32,
        color: Rgb<u8>,
    ) {
        let mut caret = x;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let advance = fonts.measure(c.encode_utf8(&mut buf), size_px);
            if !c.is_whitespace() {
                let inset = advance * 0.12;
                let (l, r) = (caret + inset, caret + advance - inset);
                let (t, b) = (top + size_px * 0.15, top + size_px * 0.95);
                self.fill_rect(l, t, r, t + 2.0, color);
                self.fill_rect(l, b - 2.0, r, b, color);
                self.fill_rect(l, t, l + 2.0, b, color);
                self.fill_rect(r - 2.0, t, r, b, color);
            }
            caret += advance;
        }
    }

    /// Rasterizes everything drawn so far.
    pub fn rasterize(&mut self) -> RgbImage {
        self.ctx.flush();
        let mut pixmap = Pixmap::new(CANVAS_WIDTH as u16, CANVAS_HEIGHT as u16);
        self.ctx.render_to_pixmap(&mut pixmap);

        // The background is opaque, so premultiplied channels equal straight ones.
        let rgba = pixmap.data_as_u8_slice();
        RgbImage::from_fn(CANVAS_WIDTH, CANVAS_HEIGHT, |x, y| {
            let at = ((y * CANVAS_WIDTH + x) * 4) as usize;
            Rgb([rgba[at], rgba[at + 1], rgba[at + 2]])
        })
    }

    /// Encodes the canvas as PNG at `path`.
    pub fn save(&mut self, path: &Path) -> Result<(), RenderError> {
        self.rasterize()
            .save(path)
            .map_err(|source| RenderError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(color: Rgb<u8>) -> Color {
    let [r, g, b] = color.0;
    Color::from_rgba8(r, g, b, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_fixed_size_background() {
        let image = Canvas::new().rasterize();
        assert_eq!(image.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(*image.get_pixel(540, 960), COLOR_BACKGROUND);
    }

    #[test]
    fn test_fill_rect_is_clipped_to_canvas() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(-50.0, -50.0, 10.0, 10.0, COLOR_ACCENT);
        canvas.fill_rect(1070.0, 1910.0, 5000.0, 5000.0, COLOR_ACCENT);
        let image = canvas.rasterize();
        assert_eq!(*image.get_pixel(0, 0), COLOR_ACCENT);
        assert_eq!(*image.get_pixel(1079, 1919), COLOR_ACCENT);
        assert_eq!(*image.get_pixel(20, 20), COLOR_BACKGROUND);
    }

    #[test]
    fn test_rounded_rect_leaves_corners_empty() {
        let mut canvas = Canvas::new();
        canvas.fill_rounded_rect(100.0, 100.0, 300.0, 164.0, 32.0, COLOR_ACCENT);
        let image = canvas.rasterize();
        assert_eq!(*image.get_pixel(100, 100), COLOR_BACKGROUND);
        assert_eq!(*image.get_pixel(200, 132), COLOR_ACCENT);
    }

    #[test]
    fn test_placeholder_text_marks_pixels() {
        let fonts = FontBook::fallback();
        let mut canvas = Canvas::new();
        canvas.draw_text(&fonts, "字", 100.0, 100.0, 46.0, COLOR_WHITE);
        let image = canvas.rasterize();
        let painted = (100..146)
            .flat_map(|x| (100..146).map(move |y| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) != COLOR_BACKGROUND)
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn test_save_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("card.png");
        let err = Canvas::new().save(&path).unwrap_err();
        assert!(matches!(err, RenderError::Encode { .. }));
    }
}
