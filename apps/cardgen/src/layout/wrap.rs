//! Character-granular text wrapping.
//!
//! The summaries are CJK text with no spaces between words, so lines break
//! between any two characters. Each embedded newline is a hard break; blank
//! paragraphs produce no lines.

use crate::layout::font_metrics::TextMeasure;

/// Canonical prefix for list items.
pub const BULLET_MARKER: &str = "• ";
/// Substituted for content dropped to respect a budget.
pub const ELLIPSIS: &str = "…";

const BULLET_GLYPHS: [char; 4] = ['-', '*', '•', '·'];

/// Wraps `text` into lines no wider than `max_width` at `size_px`.
///
/// A line only exceeds the budget when it is a single character that is
/// intrinsically wider than the budget.
pub fn wrap_text(text: &str, max_width: f32, measure: &dyn TextMeasure, size_px: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let paragraph = normalize_bullet(raw.trim());
        if paragraph.is_empty() {
            continue;
        }

        let mut current = String::new();
        for c in paragraph.chars() {
            current.push(c);
            if measure.measure(&current, size_px) <= max_width {
                continue;
            }
            current.pop();
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Rewrites a leading `-`, `*`, `•` or `·` list glyph to `BULLET_MARKER`.
/// `**` is emphasis, not a list item.
pub fn normalize_bullet(paragraph: &str) -> String {
    let mut chars = paragraph.chars();
    match (chars.next(), chars.next()) {
        (Some('*'), Some('*')) => paragraph.to_string(),
        (Some(first), _) if BULLET_GLYPHS.contains(&first) => {
            format!("{BULLET_MARKER}{}", paragraph[first.len_utf8()..].trim_start())
        }
        _ => paragraph.to_string(),
    }
}

/// Cuts `text` to at most `budget` characters. Longer text keeps `budget - 1`
/// characters followed by `ELLIPSIS`.
pub fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let kept: String = text.chars().take(budget.saturating_sub(1)).collect();
    format!("{kept}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontBook;

    /// Every character is exactly `size_px` wide.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn measure(&self, text: &str, size_px: f32) -> f32 {
            text.chars().count() as f32 * size_px
        }
    }

    #[test]
    fn test_wrap_breaks_between_characters() {
        let lines = wrap_text("一二三四五六七", 30.0, &Monospace, 10.0);
        assert_eq!(lines, vec!["一二三", "四五六", "七"]);
    }

    #[test]
    fn test_wrap_exact_fit_stays_on_one_line() {
        let lines = wrap_text("一二三", 30.0, &Monospace, 10.0);
        assert_eq!(lines, vec!["一二三"]);
    }

    #[test]
    fn test_wrap_newlines_are_hard_breaks_and_blanks_vanish() {
        let lines = wrap_text("重點一\n\n  \n重點二", 500.0, &Monospace, 10.0);
        assert_eq!(lines, vec!["重點一", "重點二"]);
    }

    #[test]
    fn test_wrap_normalizes_bullet_glyphs() {
        let lines = wrap_text("- 甲\n* 乙\n·丙\n• 丁", 500.0, &Monospace, 10.0);
        assert_eq!(lines, vec!["• 甲", "• 乙", "• 丙", "• 丁"]);
    }

    #[test]
    fn test_wrap_character_wider_than_budget_gets_own_line() {
        let lines = wrap_text("字字", 5.0, &Monospace, 10.0);
        assert_eq!(lines, vec!["字", "字"]);
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        assert!(wrap_text("", 100.0, &Monospace, 10.0).is_empty());
        assert!(wrap_text("\n\n", 100.0, &Monospace, 10.0).is_empty());
    }

    #[test]
    fn test_every_line_fits_budget_with_builtin_metrics() {
        let book = FontBook::fallback();
        let samples = [
            "降息循環開始，科技股領漲，但需留意通膨反彈與地緣政治風險。",
            "NVDA、TSM 與 0050 ETF 在本季的表現 outperform 大盤約 12.5%。",
            "- 短期：觀望\n- 中期：分批布局 AI 供應鏈\n- 長期：定期定額",
            "Mixed 中英 text with a verylongunbrokenasciiwordthatmustbesplitsomewhere 結尾",
        ];
        for budget in [120.0, 333.0, 900.0] {
            for text in samples {
                for line in wrap_text(text, budget, &book, 46.0) {
                    let width = book.measure(&line, 46.0);
                    assert!(
                        width <= budget || line.chars().count() == 1,
                        "line {line:?} is {width}px, budget {budget}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_wrap_is_greedy() {
        let book = FontBook::fallback();
        // 19 wide characters fit in 900px at 46px (874px); the 20th does not.
        let text = "字".repeat(40);
        let lines = wrap_text(&text, 900.0, &book, 46.0);
        let counts: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert_eq!(counts, vec![19, 19, 2]);
    }

    #[test]
    fn test_normalize_leaves_emphasis_alone() {
        assert_eq!(normalize_bullet("**重點**"), "**重點**");
        assert_eq!(normalize_bullet("-5% 跌幅"), "• 5% 跌幅");
    }

    #[test]
    fn test_truncate_within_budget_is_unmodified() {
        assert_eq!(truncate_chars("短標題", 32), "短標題");
        let exact = "字".repeat(32);
        assert_eq!(truncate_chars(&exact, 32), exact);
    }

    #[test]
    fn test_truncate_over_budget_keeps_budget_minus_one_plus_ellipsis() {
        let long = "字".repeat(40);
        let cut = truncate_chars(&long, 32);
        assert_eq!(cut.chars().count(), 32);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(cut.chars().filter(|c| *c == '字').count(), 31);
    }
}
