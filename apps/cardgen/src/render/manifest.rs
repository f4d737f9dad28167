//! Hand-off manifest for the external video encoder.
//!
//! ffconcat format: each card is listed with its display duration, and the
//! last card is listed once more without one, which the concat demuxer needs
//! to hold the final frame.

use std::path::{Path, PathBuf};

use crate::render::{Card, RenderError};

pub const MANIFEST_FILE_NAME: &str = "cards.ffconcat";

pub fn manifest_contents(cards: &[Card], seconds_per_card: u32) -> String {
    let mut out = String::from("ffconcat version 1.0\n");
    for card in cards {
        out.push_str(&format!("file '{}'\n", file_name(&card.path)));
        out.push_str(&format!("duration {seconds_per_card}\n"));
    }
    if let Some(last) = cards.last() {
        out.push_str(&format!("file '{}'\n", file_name(&last.path)));
    }
    out
}

/// Writes the manifest into `dir` and returns its path.
pub fn write_manifest(
    dir: &Path,
    cards: &[Card],
    seconds_per_card: u32,
) -> Result<PathBuf, RenderError> {
    let path = dir.join(MANIFEST_FILE_NAME);
    std::fs::write(&path, manifest_contents(cards, seconds_per_card)).map_err(|source| {
        RenderError::Manifest {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

/// Entries are relative to the manifest, which sits next to the cards.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
