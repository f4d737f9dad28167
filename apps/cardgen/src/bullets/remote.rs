//! Parsing of the generative service's free-form answer into bullet points.

use std::sync::LazyLock;

use regex::Regex;

use crate::bullets::prompts::{
    BULLET_PROMPT_TEMPLATE, MAX_CONTENT_CHARS, POINT_MAX_CHARS, POINT_MIN_CHARS,
};
use crate::bullets::MAX_POINTS;

/// Leading list glyphs and enumerations such as `1.`, `(2)`, `3、`, `４．`.
static POINT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•·+]\s*|[(（]?[0-9０-９]{1,2}[.)、．）:：]\s*)+")
        .expect("point prefix pattern is a valid regex")
});

pub fn build_bullet_prompt(section_title: &str, content: &str) -> String {
    let content: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    fill_template(
        BULLET_PROMPT_TEMPLATE,
        &[
            ("section_title", section_title),
            ("min_chars", &POINT_MIN_CHARS.to_string()),
            ("max_chars", &POINT_MAX_CHARS.to_string()),
            ("content", &content),
        ],
    )
}

/// Substitutes `{key}` placeholders in one pass. Inserted values are never
/// scanned again, so braces inside a title or the content stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let found = values.iter().find(|(key, _)| {
            tail.strip_prefix(*key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match found {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One point per non-blank line, prefixes and emphasis removed, at most `MAX_POINTS`.
/// Code fences are skipped. An empty result means the answer was unusable.
pub fn parse_points(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("```"))
        .map(|line| {
            POINT_PREFIX_RE
                .replace(line, "")
                .replace("**", "")
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_POINTS)
        .collect()
}
