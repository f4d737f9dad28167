// Card rendering: the fixed canvas, the two card renderers, the run pipeline
// and the hand-off manifest for the video encoder.

pub mod canvas;
pub mod handlers;
pub mod manifest;
pub mod pipeline;
pub mod section_card;
pub mod title_card;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::summary::SectionKind;

pub use pipeline::CardSequenceBuilder;

/// Filesystem and encoding failures. The only errors that abort a run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write card {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cannot write manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("render worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "section", rename_all = "snake_case")]
pub enum CardKind {
    Title,
    Section(SectionKind),
}

/// One persisted card. Never mutated after its PNG is written.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    /// 0 for the title card, 1..=N for sections in priority order.
    pub index: usize,
    pub kind: CardKind,
    /// Title text for the title card, section label otherwise.
    pub label: String,
    pub path: PathBuf,
    /// Visible content lines, truncation sentinel included.
    pub lines: Vec<String>,
    pub truncated: bool,
}

/// `card_00.png`, `card_01.png`, …
pub fn card_file_name(index: usize) -> String {
    format!("card_{index:02}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_file_names_are_zero_padded() {
        assert_eq!(card_file_name(0), "card_00.png");
        assert_eq!(card_file_name(6), "card_06.png");
        assert_eq!(card_file_name(12), "card_12.png");
    }

    #[test]
    fn test_card_kind_serializes_with_section() {
        let value = serde_json::to_value(CardKind::Section(SectionKind::Risks)).unwrap();
        assert_eq!(value["kind"], "section");
        assert_eq!(value["section"], "Risks");
        let title = serde_json::to_value(CardKind::Title).unwrap();
        assert_eq!(title["kind"], "title");
    }
}
