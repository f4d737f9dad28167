//! Section card: progress indicator, self-sizing label badge, divider, the
//! content region and a footer with the parent title.
//!
//! # Content region
//! - Bullet mode (points available): each point wraps on its own, the bullet
//!   glyph sits at the margin and every line of the point hangs at the indent.
//!   Points are separated by `POINT_GAP`.
//! - Plain mode (no points): the raw content wraps as one block.
//!
//! Both modes share one line budget, counted in wrapped lines. Gaps between
//! points are not charged against it; the footer reserve absorbs them.
//! Content is never scaled down: when it does not fit, the last visible line
//! becomes the ellipsis sentinel and the card shows exactly
//! `max_content_lines()` lines. An exact fit is not truncated.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::layout::font_metrics::{FontBook, TextMeasure};
use crate::layout::wrap::{truncate_chars, wrap_text, ELLIPSIS};
use crate::render::canvas::{
    Canvas, ACCENT_BAR_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, COLOR_ACCENT, COLOR_BACKGROUND,
    COLOR_CARD, COLOR_DIM, COLOR_GRAY, COLOR_WHITE, CONTENT_WIDTH, FONT_SIZE_CONTENT,
    FONT_SIZE_FOOTER, FONT_SIZE_LABEL, FONT_SIZE_PROGRESS, MARGIN,
};
use crate::render::{Card, CardKind, RenderError};
use crate::summary::SectionKind;

const PROGRESS_TOP: f32 = 38.0;

const BADGE_TOP: f32 = 95.0;
const BADGE_BOTTOM: f32 = 158.0;
const BADGE_RADIUS: f32 = 32.0;
/// Horizontal padding added to the measured label width (both sides together).
const BADGE_PADDING: f32 = 52.0;
const BADGE_TEXT_TOP: f32 = 106.0;

const DIVIDER_TOP: f32 = 186.0;
const DIVIDER_BOTTOM: f32 = 189.0;

pub const CONTENT_TOP: f32 = 220.0;
pub const CONTENT_LINE_HEIGHT: f32 = FONT_SIZE_CONTENT + 18.0;
/// Vertical space above the content region counted against the line budget.
const BUDGET_TOP_OFFSET: f32 = 280.0;
/// Vertical space reserved for the footer.
const BUDGET_BOTTOM_RESERVED: f32 = 160.0;

/// Hanging indent of bullet text relative to the margin.
pub const BULLET_INDENT: f32 = 48.0;
pub const BULLET_GLYPH: &str = "•";
/// Extra space between two points.
pub const POINT_GAP: f32 = 24.0;

const FOOTER_RULE_TOP: f32 = CANVAS_HEIGHT as f32 - 130.0;
const FOOTER_RULE_BOTTOM: f32 = CANVAS_HEIGHT as f32 - 128.0;
const FOOTER_TEXT_TOP: f32 = CANVAS_HEIGHT as f32 - 100.0;
/// Longest footer caption in characters, ellipsis included.
pub const FOOTER_MAX_CHARS: usize = 32;

/// Maximum number of visible content lines on a section card.
pub fn max_content_lines() -> usize {
    ((CANVAS_HEIGHT as f32 - BUDGET_TOP_OFFSET - BUDGET_BOTTOM_RESERVED) / CONTENT_LINE_HEIGHT)
        .floor() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Plain,
    Bullets,
}

/// One content line with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Draw the bullet glyph at the margin on this line.
    pub marker: bool,
}

/// Everything a section card needs to be drawn. Owned so it can cross into a
/// blocking render task.
#[derive(Debug, Clone)]
pub struct SectionCardInput {
    pub kind: SectionKind,
    pub content: String,
    pub points: Vec<String>,
    /// 1-based position among the present sections.
    pub index: usize,
    pub total: usize,
    pub parent_title: String,
    pub path: PathBuf,
}

/// Where everything on a section card goes. Pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub label: String,
    pub badge_width: f32,
    pub progress: String,
    pub progress_x: f32,
    pub mode: ContentMode,
    pub lines: Vec<PlacedLine>,
    pub truncated: bool,
    pub footer: String,
}

impl SectionLayout {
    pub fn compute(fonts: &FontBook, input: &SectionCardInput) -> Self {
        let label = input.kind.label().to_string();
        let badge_width = fonts.measure(&label, FONT_SIZE_LABEL) + BADGE_PADDING;

        let progress = format!("{} / {}", input.index, input.total);
        let progress_x =
            CANVAS_WIDTH as f32 - MARGIN - fonts.measure(&progress, FONT_SIZE_PROGRESS).floor();

        let budget = max_content_lines();
        let (mode, lines, truncated) = if input.points.is_empty() {
            let (lines, truncated) = layout_plain(fonts, &input.content, budget);
            (ContentMode::Plain, lines, truncated)
        } else {
            let (lines, truncated) = layout_bullets(fonts, &input.points, budget);
            (ContentMode::Bullets, lines, truncated)
        };

        Self {
            label,
            badge_width,
            progress,
            progress_x,
            mode,
            lines,
            truncated,
            footer: truncate_chars(&input.parent_title, FOOTER_MAX_CHARS),
        }
    }

    pub fn paint(&self, fonts: &FontBook) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.fill_rect(0.0, 0.0, CANVAS_WIDTH as f32, ACCENT_BAR_HEIGHT, COLOR_ACCENT);

        canvas.draw_text(
            fonts,
            &self.progress,
            self.progress_x,
            PROGRESS_TOP,
            FONT_SIZE_PROGRESS,
            COLOR_DIM,
        );

        canvas.fill_rounded_rect(
            MARGIN,
            BADGE_TOP,
            MARGIN + self.badge_width.floor(),
            BADGE_BOTTOM,
            BADGE_RADIUS,
            COLOR_ACCENT,
        );
        canvas.draw_text(
            fonts,
            &self.label,
            MARGIN + BADGE_PADDING / 2.0,
            BADGE_TEXT_TOP,
            FONT_SIZE_LABEL,
            COLOR_BACKGROUND,
        );

        canvas.fill_rect(MARGIN, DIVIDER_TOP, CANVAS_WIDTH as f32 - MARGIN, DIVIDER_BOTTOM, COLOR_CARD);

        for line in &self.lines {
            if line.marker {
                canvas.draw_text(fonts, BULLET_GLYPH, MARGIN, line.y, FONT_SIZE_CONTENT, COLOR_ACCENT);
            }
            canvas.draw_text(fonts, &line.text, line.x, line.y, FONT_SIZE_CONTENT, COLOR_WHITE);
        }

        canvas.fill_rect(0.0, FOOTER_RULE_TOP, CANVAS_WIDTH as f32, FOOTER_RULE_BOTTOM, COLOR_DIM);
        canvas.draw_text(fonts, &self.footer, MARGIN, FOOTER_TEXT_TOP, FONT_SIZE_FOOTER, COLOR_GRAY);
        canvas
    }

    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }
}

fn layout_plain(fonts: &FontBook, content: &str, budget: usize) -> (Vec<PlacedLine>, bool) {
    let mut wrapped = wrap_text(content, CONTENT_WIDTH, fonts, FONT_SIZE_CONTENT);
    let truncated = wrapped.len() > budget;
    if truncated {
        wrapped.truncate(budget.saturating_sub(1));
        wrapped.push(ELLIPSIS.to_string());
    }

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| PlacedLine {
            text,
            x: MARGIN,
            y: CONTENT_TOP + i as f32 * CONTENT_LINE_HEIGHT,
            marker: false,
        })
        .collect();
    (lines, truncated)
}

fn layout_bullets(fonts: &FontBook, points: &[String], budget: usize) -> (Vec<PlacedLine>, bool) {
    let text_x = MARGIN + BULLET_INDENT;
    let width = CONTENT_WIDTH - BULLET_INDENT;

    let mut lines: Vec<PlacedLine> = Vec::new();
    let mut y = CONTENT_TOP;

    for (i, point) in points.iter().enumerate() {
        if lines.len() > budget {
            break;
        }
        if i > 0 {
            y += POINT_GAP;
        }
        for (j, text) in wrap_text(point, width, fonts, FONT_SIZE_CONTENT)
            .into_iter()
            .enumerate()
        {
            lines.push(PlacedLine {
                text,
                x: text_x,
                y,
                marker: j == 0,
            });
            y += CONTENT_LINE_HEIGHT;
        }
    }

    let truncated = lines.len() > budget;
    if truncated {
        lines.truncate(budget);
        if let Some(last) = lines.last_mut() {
            last.text = ELLIPSIS.to_string();
            last.marker = false;
        }
    }
    (lines, truncated)
}

/// Renders one section card to `input.path`.
pub fn render_section_card(fonts: &FontBook, input: &SectionCardInput) -> Result<Card, RenderError> {
    let layout = SectionLayout::compute(fonts, input);
    layout.paint(fonts).save(&input.path)?;
    debug!(
        path = %input.path.display(),
        section = layout.label.as_str(),
        mode = ?layout.mode,
        lines = layout.lines.len(),
        truncated = layout.truncated,
        "Rendered section card"
    );

    Ok(Card {
        index: input.index,
        kind: CardKind::Section(input.kind),
        label: layout.label.clone(),
        path: input.path.clone(),
        lines: layout.line_texts(),
        truncated: layout.truncated,
    })
}
