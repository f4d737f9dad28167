//! Prompt constants for bullet extraction.
//!
//! The model answers in plain lines, one bullet per line. `remote::parse_points`
//! tolerates numbering and list glyphs anyway.

/// Shortest bullet the service is asked for, in characters.
pub const POINT_MIN_CHARS: usize = 12;
/// Longest bullet the service is asked for, in characters.
pub const POINT_MAX_CHARS: usize = 30;
/// Section content beyond this many characters is not sent.
pub const MAX_CONTENT_CHARS: usize = 4000;

pub const BULLET_SYSTEM: &str = "\
你是一位專業的投資內容編輯，負責把投資摘要的段落濃縮成短影音卡片上的重點。\n\
一律使用繁體中文回答。\n\
只輸出重點本身，每行一個重點，不要任何前言、結語或說明。";

pub const BULLET_PROMPT_TEMPLATE: &str = "\
請將以下「{section_title}」段落整理成剛好 5 個重點。\n\
\n\
規則：\n\
1. 每個重點都是完整的一句話，長度介於 {min_chars} 到 {max_chars} 個字\n\
2. 每行一個重點，共 5 行\n\
3. 行首不要加編號、項目符號或任何標記\n\
4. 只根據原文內容，不要自行補充數字或結論\n\
\n\
段落內容：\n\
{content}";
