//! Local bullet strategy: deterministic, no external dependency, always available.

use crate::bullets::MAX_POINTS;
use crate::layout::wrap::truncate_chars;

/// Longest local bullet in characters, ellipsis included.
pub const LOCAL_POINT_MAX_CHARS: usize = 40;

const EMPHASIS_MARKERS: [&str; 3] = ["**", "__", "`"];
const LIST_GLYPHS: [char; 5] = ['-', '*', '•', '·', '+'];

/// Up to `MAX_POINTS` cleaned, length-capped lines of `content`, in order.
pub fn local_points(content: &str) -> Vec<String> {
    content
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .map(|line| truncate_chars(&line, LOCAL_POINT_MAX_CHARS))
        .take(MAX_POINTS)
        .collect()
}

/// Removes emphasis markup and a leading list glyph.
fn clean_line(line: &str) -> String {
    let mut text = line.to_string();
    for marker in EMPHASIS_MARKERS {
        text = text.replace(marker, "");
    }
    text.trim()
        .trim_start_matches(|c: char| LIST_GLYPHS.contains(&c) || c.is_whitespace())
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::wrap::ELLIPSIS;

    #[test]
    fn test_local_points_splits_lines() {
        assert_eq!(local_points("重點一\n重點二"), vec!["重點一", "重點二"]);
    }

    #[test]
    fn test_local_points_strips_markup_and_glyphs() {
        let content = "- **降息**循環開始\n* 科技股`領漲`\n• 留意通膨\n  · 分批布局";
        assert_eq!(
            local_points(content),
            vec!["降息循環開始", "科技股領漲", "留意通膨", "分批布局"]
        );
    }

    #[test]
    fn test_local_points_caps_at_five_and_skips_blanks() {
        let content = "一\n\n二\n-\n三\n四\n五\n六\n七";
        let points = local_points(content);
        assert_eq!(points, vec!["一", "二", "三", "四", "五"]);
    }

    #[test]
    fn test_local_points_truncates_long_lines() {
        let long = "字".repeat(60);
        let points = local_points(&long);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].chars().count(), LOCAL_POINT_MAX_CHARS);
        assert!(points[0].ends_with(ELLIPSIS));
    }

    #[test]
    fn test_local_points_empty_content() {
        assert!(local_points("").is_empty());
        assert!(local_points("**\n  \n- ").is_empty());
    }
}
