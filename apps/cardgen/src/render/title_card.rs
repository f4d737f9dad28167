//! Title card: brand, channel, a vertically centered title block, an accent
//! mark under it and a fixed caption at the bottom.

use std::path::Path;

use tracing::debug;

use crate::layout::font_metrics::FontBook;
use crate::layout::wrap::wrap_text;
use crate::render::canvas::{
    Canvas, ACCENT_BAR_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, COLOR_ACCENT, COLOR_DIM, COLOR_GRAY,
    COLOR_WHITE, CONTENT_WIDTH, FONT_SIZE_BRAND, FONT_SIZE_CHANNEL, FONT_SIZE_FOOTER,
    FONT_SIZE_TITLE, MARGIN,
};
use crate::render::{Card, CardKind, RenderError};

pub const BRAND_LABEL: &str = "Investment Digest";
pub const TITLE_FOOTER_CAPTION: &str = "AI 投資摘要";

const BRAND_TOP: f32 = 55.0;
const CHANNEL_TOP: f32 = 110.0;
const TITLE_LINE_HEIGHT: i32 = FONT_SIZE_TITLE as i32 + 22;
const ACCENT_GAP: f32 = 36.0;
const ACCENT_WIDTH: f32 = 80.0;
const ACCENT_THICKNESS: f32 = 8.0;
const FOOTER_TOP: f32 = CANVAS_HEIGHT as f32 - 110.0;

/// Where everything on the title card goes. Pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleLayout {
    pub channel: String,
    pub lines: Vec<String>,
    /// Top of the first title line.
    pub title_top: f32,
    /// Top of the accent mark below the block.
    pub accent_top: f32,
}

impl TitleLayout {
    pub fn compute(fonts: &FontBook, title: &str, channel: &str) -> Self {
        let lines = wrap_text(title, CONTENT_WIDTH, fonts, FONT_SIZE_TITLE);
        let block_height = lines.len() as i32 * TITLE_LINE_HEIGHT;
        let title_top = (CANVAS_HEIGHT as i32 / 2 - block_height / 2) as f32;
        let accent_top = title_top + block_height as f32 + ACCENT_GAP;

        Self {
            channel: channel.to_string(),
            lines,
            title_top,
            accent_top,
        }
    }

    pub fn paint(&self, fonts: &FontBook) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.fill_rect(0.0, 0.0, CANVAS_WIDTH as f32, ACCENT_BAR_HEIGHT, COLOR_ACCENT);

        canvas.draw_text(fonts, BRAND_LABEL, MARGIN, BRAND_TOP, FONT_SIZE_BRAND, COLOR_ACCENT);
        canvas.draw_text(fonts, &self.channel, MARGIN, CHANNEL_TOP, FONT_SIZE_CHANNEL, COLOR_GRAY);

        let mut y = self.title_top;
        for line in &self.lines {
            canvas.draw_text(fonts, line, MARGIN, y, FONT_SIZE_TITLE, COLOR_WHITE);
            y += TITLE_LINE_HEIGHT as f32;
        }

        canvas.fill_rect(
            MARGIN,
            self.accent_top,
            MARGIN + ACCENT_WIDTH,
            self.accent_top + ACCENT_THICKNESS,
            COLOR_ACCENT,
        );
        canvas.draw_text(
            fonts,
            TITLE_FOOTER_CAPTION,
            MARGIN,
            FOOTER_TOP,
            FONT_SIZE_FOOTER,
            COLOR_DIM,
        );
        canvas
    }
}

/// Renders the title card (index 0) to `path`.
pub fn render_title_card(
    fonts: &FontBook,
    title: &str,
    channel: &str,
    path: &Path,
) -> Result<Card, RenderError> {
    let layout = TitleLayout::compute(fonts, title, channel);
    layout.paint(fonts).save(path)?;
    debug!(path = %path.display(), lines = layout.lines.len(), "Rendered title card");

    Ok(Card {
        index: 0,
        kind: CardKind::Title,
        label: title.to_string(),
        path: path.to_path_buf(),
        lines: layout.lines,
        truncated: false,
    })
}
