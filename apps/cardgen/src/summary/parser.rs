//! Markdown summary parser.
//!
//! Never fails: a document without frontmatter, title or sections still yields a
//! `Summary` (default title, no sections), so a run always has a title card.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::summary::sections::SectionKind;

/// Title used when the document has no `# ` heading.
pub const DEFAULT_TITLE: &str = "投資摘要";

const FRONTMATTER_DELIMITER: &str = "---";

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link pattern is a valid regex")
});

/// One `##` section in source order. `content` is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub content: String,
}

/// A parsed summary document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    /// `key: value` pairs from the frontmatter block, in source order.
    pub metadata: Vec<(String, String)>,
    /// All non-empty `##` sections in source order, recognized or not.
    pub sections: Vec<Section>,
}

impl Summary {
    #[cfg(test)]
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.content.as_str())
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Channel label recorded in the frontmatter, if any.
    pub fn channel_name(&self) -> Option<&str> {
        self.metadata_value("channel_name").filter(|v| !v.is_empty())
    }

    /// Recognized sections in priority order. Absent kinds are skipped and
    /// unrecognized headings are dropped.
    pub fn ordered_sections(&self) -> Vec<(SectionKind, &str)> {
        let mut recognized: Vec<(SectionKind, &str)> = self
            .sections
            .iter()
            .filter_map(|s| SectionKind::from_heading(&s.name).map(|kind| (kind, s.content.as_str())))
            .collect();
        recognized.sort_by_key(|(kind, _)| *kind);
        recognized
    }

    /// Writes the summary back in the format `parse_summary` reads.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        if !self.metadata.is_empty() {
            out.push_str(FRONTMATTER_DELIMITER);
            out.push('\n');
            for (key, value) in &self.metadata {
                out.push_str(&format!("{key}: {value}\n"));
            }
            out.push_str(FRONTMATTER_DELIMITER);
            out.push_str("\n\n");
        }
        out.push_str(&format!("# {}\n\n", self.title));
        for section in &self.sections {
            out.push_str(&format!("## {}\n\n{}\n\n", section.name, section.content));
        }
        out
    }
}

/// Parses a summary document.
pub fn parse_summary(text: &str) -> Summary {
    let (metadata, body) = split_frontmatter(text);
    let body = strip_links(body);

    let title = body
        .lines()
        .filter_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string();

    Summary {
        title,
        metadata,
        sections: extract_sections(&body),
    }
}

/// Rewrites `[label](url)` to `label`.
pub fn strip_links(text: &str) -> String {
    LINK_RE.replace_all(text, "$1").into_owned()
}

/// Splits a leading `---` delimited block off the document. An unterminated
/// block is treated as ordinary text.
fn split_frontmatter(text: &str) -> (Vec<(String, String)>, &str) {
    let mut lines = text.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FRONTMATTER_DELIMITER => {}
        _ => return (Vec::new(), text),
    }

    let mut offset = text.split_inclusive('\n').next().map_or(0, str::len);
    let mut metadata = Vec::new();
    for line in lines {
        offset += line.len();
        if line.trim_end() == FRONTMATTER_DELIMITER {
            return (metadata, &text[offset..]);
        }
        if let Some(pair) = parse_metadata_line(line) {
            metadata.push(pair);
        }
    }

    (Vec::new(), text)
}

fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Collects `## ` sections. A section runs until the next `## ` heading or the
/// end of the text; sections whose content trims to nothing are dropped. A
/// repeated heading keeps its first position and takes the later content.
fn extract_sections(body: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            if let Some((name, content)) = current.take() {
                push_section(&mut sections, name, &content);
            }
            current = Some((heading.trim().to_string(), Vec::new()));
        } else if let Some((_, content)) = current.as_mut() {
            content.push(line);
        }
    }
    if let Some((name, content)) = current {
        push_section(&mut sections, name, &content);
    }

    sections
}

fn push_section(sections: &mut Vec<Section>, name: String, lines: &[&str]) {
    let content = lines.join("\n").trim().to_string();
    if name.is_empty() || content.is_empty() {
        return;
    }
    match sections.iter_mut().find(|s| s.name == name) {
        Some(existing) => existing.content = content,
        None => sections.push(Section { name, content }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOC: &str = "---\n\
title: 美股展望\n\
video_id: abc123\n\
channel_name: 財經頻道\n\
---\n\
\n\
# 美股展望：降息之後\n\
\n\
🔗 [YouTube 觀看原片](https://youtube.com/watch?v=abc123)\n\
\n\
## 風險提示\n\
- 通膨反彈\n\
- 詳見[聯準會聲明](https://fed.gov/x)\n\
\n\
## 核心觀點\n\
1. 降息循環開始\n\
2. 科技股領漲\n\
\n\
## 逐字稿原文\n\
不會變成卡片\n";

    #[test]
    fn test_parse_extracts_title_and_metadata() {
        let summary = parse_summary(FULL_DOC);
        assert_eq!(summary.title, "美股展望：降息之後");
        assert_eq!(summary.metadata_value("video_id"), Some("abc123"));
        assert_eq!(summary.channel_name(), Some("財經頻道"));
    }

    #[test]
    fn test_parse_rewrites_links_to_labels() {
        let summary = parse_summary(FULL_DOC);
        let risks = summary.section("風險提示").unwrap();
        assert!(risks.contains("詳見聯準會聲明"), "got {risks}");
        assert!(!risks.contains("https://"));
    }

    #[test]
    fn test_parse_keeps_source_order_but_orders_by_priority() {
        let summary = parse_summary(FULL_DOC);
        let names: Vec<&str> = summary.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["風險提示", "核心觀點", "逐字稿原文"]);

        let ordered: Vec<SectionKind> = summary.ordered_sections().iter().map(|(k, _)| *k).collect();
        assert_eq!(ordered, vec![SectionKind::CoreViews, SectionKind::Risks]);
    }

    #[test]
    fn test_parse_without_frontmatter_or_title_uses_default() {
        let summary = parse_summary("just some text\n## 核心觀點\n內容");
        assert_eq!(summary.title, DEFAULT_TITLE);
        assert!(summary.metadata.is_empty());
        assert_eq!(summary.section("核心觀點"), Some("內容"));
    }

    #[test]
    fn test_parse_empty_input_degrades_to_defaults() {
        let summary = parse_summary("");
        assert_eq!(summary.title, DEFAULT_TITLE);
        assert!(summary.sections.is_empty());
    }

    #[test]
    fn test_empty_section_is_dropped() {
        let summary = parse_summary("# T\n## 核心觀點\n   \n\n## 風險提示\n風險A\n");
        assert_eq!(summary.section("核心觀點"), None);
        assert_eq!(summary.section("風險提示"), Some("風險A"));
    }

    #[test]
    fn test_third_level_heading_stays_inside_section() {
        let summary = parse_summary("# T\n## 關鍵數據\n### 子標題\n數字 42\n");
        assert_eq!(summary.section("關鍵數據"), Some("### 子標題\n數字 42"));
    }

    #[test]
    fn test_unterminated_frontmatter_is_plain_text() {
        let summary = parse_summary("---\nkey: value\n# 標題\n");
        assert!(summary.metadata.is_empty());
        assert_eq!(summary.title, "標題");
    }

    #[test]
    fn test_repeated_heading_takes_later_content() {
        let summary = parse_summary("# T\n## 核心觀點\n舊\n## 風險提示\nR\n## 核心觀點\n新\n");
        assert_eq!(summary.section("核心觀點"), Some("新"));
        assert_eq!(summary.sections[0].name, "核心觀點");
    }

    #[test]
    fn test_reparse_of_serialized_summary_is_stable() {
        let first = parse_summary(FULL_DOC);
        let second = parse_summary(&first.to_markdown());
        assert_eq!(second.title, first.title);
        assert_eq!(second.metadata, first.metadata);
        assert_eq!(second.sections, first.sections);
    }

    #[test]
    fn test_crlf_input_is_handled() {
        let summary = parse_summary("---\r\nchannel_name: X\r\n---\r\n# 標題\r\n## 核心觀點\r\n重點\r\n");
        assert_eq!(summary.channel_name(), Some("X"));
        assert_eq!(summary.title, "標題");
        assert_eq!(summary.section("核心觀點"), Some("重點"));
    }
}
