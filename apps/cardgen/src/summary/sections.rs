//! The fixed section enumeration that decides which `##` headings become cards
//! and in which order. Document order never matters.

use serde::{Deserialize, Serialize};

/// A recognized summary section, in render priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// 核心觀點
    CoreViews,
    /// 提及標的
    MentionedAssets,
    /// 關鍵數據
    KeyFigures,
    /// 投資機會
    Opportunities,
    /// 風險提示
    Risks,
    /// 個人行動建議
    ActionItems,
}

/// Render order for section cards.
pub const SECTION_PRIORITY: [SectionKind; 6] = [
    SectionKind::CoreViews,
    SectionKind::MentionedAssets,
    SectionKind::KeyFigures,
    SectionKind::Opportunities,
    SectionKind::Risks,
    SectionKind::ActionItems,
];

impl SectionKind {
    /// The heading text as it appears in the document and on the card badge.
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::CoreViews => "核心觀點",
            SectionKind::MentionedAssets => "提及標的",
            SectionKind::KeyFigures => "關鍵數據",
            SectionKind::Opportunities => "投資機會",
            SectionKind::Risks => "風險提示",
            SectionKind::ActionItems => "個人行動建議",
        }
    }

    /// Maps a heading back to its kind. Unknown headings return `None` and are never rendered.
    pub fn from_heading(heading: &str) -> Option<Self> {
        let heading = heading.trim();
        SECTION_PRIORITY.into_iter().find(|k| k.label() == heading)
    }
}
