use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Font files tried in order when `FONT_PATHS` is not set. The first one that
/// loads wins; all of them carry CJK coverage.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
];

const DEFAULT_SECONDS_PER_CARD: u32 = 4;

/// Application configuration loaded from environment variables.
/// Only numeric parse failures are fatal; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// When set, bullet points come from the generative service.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub bullet_timeout: Duration,
    pub output_dir: PathBuf,
    pub font_candidates: Vec<PathBuf>,
    pub seconds_per_card: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            bullet_timeout: Duration::from_secs(
                parse_env("BULLET_TIMEOUT_SECS", 30)
                    .context("BULLET_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            output_dir: optional_env("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/cards")),
            font_candidates: optional_env("FONT_PATHS")
                .map(|raw| split_font_paths(&raw))
                .unwrap_or_else(|| DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect()),
            seconds_per_card: match optional_env("SECONDS_PER_CARD") {
                Some(raw) => parse_seconds_per_card(&raw)?,
                None => DEFAULT_SECONDS_PER_CARD,
            },
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for '{key}': {raw}")),
        None => Ok(default),
    }
}

/// Display time of one card in the manifest. Zero is rejected.
fn parse_seconds_per_card(raw: &str) -> Result<u32> {
    raw.parse::<NonZeroU32>()
        .map(NonZeroU32::get)
        .with_context(|| format!("SECONDS_PER_CARD must be a positive integer, got '{raw}'"))
}

fn split_font_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
