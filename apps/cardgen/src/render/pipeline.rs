//! Card sequence builder — one summary document in, an ordered list of cards out.
//!
//! parse → title card (index 0) → for each present section in priority order:
//! bullet points, then the section card (1-based index, total = present
//! sections) → hand-off manifest.
//!
//! Sections run strictly one after another. Painting and PNG encoding are
//! CPU-bound, so each card is drawn inside `spawn_blocking` on owned data.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::bullets::BulletExtractor;
use crate::layout::font_metrics::FontBook;
use crate::render::manifest::write_manifest;
use crate::render::section_card::{render_section_card, SectionCardInput};
use crate::render::title_card::render_title_card;
use crate::render::{card_file_name, Card, RenderError};
use crate::summary::{parse_summary, Summary};

const DEFAULT_SECONDS_PER_CARD: u32 = 4;

/// Result of one document run.
#[derive(Debug, Clone, Serialize)]
pub struct CardRun {
    pub title: String,
    /// Title card first, then sections in priority order.
    pub cards: Vec<Card>,
    pub manifest: PathBuf,
}

/// Holds the injected resources for card runs. Cheap to clone; independent
/// builders share nothing mutable.
#[derive(Debug, Clone)]
pub struct CardSequenceBuilder {
    fonts: Arc<FontBook>,
    extractor: BulletExtractor,
    seconds_per_card: u32,
}

impl CardSequenceBuilder {
    pub fn new(fonts: Arc<FontBook>, extractor: BulletExtractor) -> Self {
        Self {
            fonts,
            extractor,
            seconds_per_card: DEFAULT_SECONDS_PER_CARD,
        }
    }

    pub fn with_seconds_per_card(mut self, seconds: u32) -> Self {
        self.seconds_per_card = seconds;
        self
    }

    pub fn extractor(&self) -> &BulletExtractor {
        &self.extractor
    }

    /// Renders every card of `markdown` into `output_dir`.
    ///
    /// `channel` overrides the frontmatter `channel_name`. Only filesystem and
    /// encoding failures are returned; an existing directory is fine.
    pub async fn build(
        &self,
        markdown: &str,
        channel: Option<&str>,
        output_dir: &Path,
    ) -> Result<CardRun, RenderError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| RenderError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let summary = parse_summary(markdown);
        let channel = resolve_channel(channel, &summary);

        let mut cards = Vec::new();

        let fonts = self.fonts.clone();
        let title = summary.title.clone();
        let path = output_dir.join(card_file_name(0));
        cards.push(
            run_blocking(move || render_title_card(&fonts, &title, &channel, &path)).await?,
        );

        let sections = summary.ordered_sections();
        let total = sections.len();
        for (i, (kind, content)) in sections.into_iter().enumerate() {
            let index = i + 1;
            let bullets = self.extractor.points_for(kind.label(), content).await;

            let input = SectionCardInput {
                kind,
                content: content.to_string(),
                points: bullets.points,
                index,
                total,
                parent_title: summary.title.clone(),
                path: output_dir.join(card_file_name(index)),
            };
            let fonts = self.fonts.clone();
            cards.push(run_blocking(move || render_section_card(&fonts, &input)).await?);
        }

        let manifest = write_manifest(output_dir, &cards, self.seconds_per_card)?;

        info!(
            title = summary.title.as_str(),
            cards = cards.len(),
            dir = %output_dir.display(),
            strategy = self.extractor.strategy_name(),
            "Card run complete"
        );

        Ok(CardRun {
            title: summary.title,
            cards,
            manifest,
        })
    }
}

/// Caller-supplied channel first, then the frontmatter `channel_name`, else empty.
fn resolve_channel(requested: Option<&str>, summary: &Summary) -> String {
    requested
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or(summary.channel_name())
        .unwrap_or_default()
        .to_string()
}

async fn run_blocking<F>(render: F) -> Result<Card, RenderError>
where
    F: FnOnce() -> Result<Card, RenderError> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{CompletionService, LlmError};
    use crate::render::manifest::MANIFEST_FILE_NAME;
    use crate::render::CardKind;
    use crate::summary::SectionKind;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Unreachable;

    #[async_trait]
    impl CompletionService for Unreachable {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    fn local_builder() -> CardSequenceBuilder {
        CardSequenceBuilder::new(Arc::new(FontBook::fallback()), BulletExtractor::Local)
    }

    const TEST_DOC: &str = "# 測試影片標題\n\n## 風險提示\n風險A\n\n## 核心觀點\n重點一\n重點二\n";

    #[tokio::test]
    async fn test_priority_order_overrides_source_order() {
        let dir = tempfile::tempdir().unwrap();
        let run = local_builder().build(TEST_DOC, None, dir.path()).await.unwrap();

        assert_eq!(run.title, "測試影片標題");
        assert_eq!(run.cards.len(), 3);

        assert_eq!(run.cards[0].index, 0);
        assert_eq!(run.cards[0].kind, CardKind::Title);

        assert_eq!(run.cards[1].index, 1);
        assert_eq!(run.cards[1].kind, CardKind::Section(SectionKind::CoreViews));
        assert_eq!(run.cards[1].label, "核心觀點");
        assert_eq!(run.cards[1].lines.len(), 2);

        assert_eq!(run.cards[2].index, 2);
        assert_eq!(run.cards[2].kind, CardKind::Section(SectionKind::Risks));
        assert_eq!(run.cards[2].label, "風險提示");
        assert_eq!(run.cards[2].lines.len(), 1);

        for (i, card) in run.cards.iter().enumerate() {
            assert_eq!(card.path, dir.path().join(card_file_name(i)));
            assert!(card.path.exists());
        }
        assert_eq!(run.manifest, dir.path().join(MANIFEST_FILE_NAME));
    }

    #[tokio::test]
    async fn test_unrecognized_sections_never_become_cards() {
        let dir = tempfile::tempdir().unwrap();
        let doc = "# 標題\n## 逐字稿原文\n很長的逐字稿\n## 投資機會\n機會\n";
        let run = local_builder().build(doc, None, dir.path()).await.unwrap();

        assert_eq!(run.cards.len(), 2);
        assert_eq!(run.cards[1].kind, CardKind::Section(SectionKind::Opportunities));
        assert!(!dir.path().join(card_file_name(2)).exists());
    }

    #[tokio::test]
    async fn test_empty_document_still_yields_title_card() {
        let dir = tempfile::tempdir().unwrap();
        let run = local_builder().build("", None, dir.path()).await.unwrap();
        assert_eq!(run.cards.len(), 1);
        assert_eq!(run.cards[0].label, crate::summary::parser::DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_existing_output_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let builder = local_builder();
        builder.build(TEST_DOC, None, dir.path()).await.unwrap();
        let again = builder.build(TEST_DOC, None, dir.path()).await.unwrap();
        assert_eq!(again.cards.len(), 3);
    }

    #[tokio::test]
    async fn test_unwritable_output_location_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, b"a file, not a directory").unwrap();

        let err = local_builder()
            .build(TEST_DOC, None, &blocker.join("job"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::CreateDir { .. }));
    }

    #[tokio::test]
    async fn test_failing_remote_service_gives_same_cards_as_local() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = BulletExtractor::remote(Arc::new(Unreachable), Duration::from_secs(1));
        let builder = CardSequenceBuilder::new(Arc::new(FontBook::fallback()), extractor);

        let run = builder.build(TEST_DOC, None, dir.path()).await.unwrap();

        let line_counts: Vec<usize> = run.cards.iter().map(|c| c.lines.len()).collect();
        assert_eq!(line_counts, vec![1, 2, 1]);
    }

    #[test]
    fn test_channel_comes_from_request_then_frontmatter() {
        let with_meta = parse_summary("---\nchannel_name: 財經頻道\n---\n# 標題\n");
        let without_meta = parse_summary("# 標題\n");

        assert_eq!(resolve_channel(Some(" 我的頻道 "), &with_meta), "我的頻道");
        assert_eq!(resolve_channel(Some("  "), &with_meta), "財經頻道");
        assert_eq!(resolve_channel(None, &with_meta), "財經頻道");
        assert_eq!(resolve_channel(None, &without_meta), "");
    }

    #[tokio::test]
    async fn test_manifest_uses_configured_duration() {
        let dir = tempfile::tempdir().unwrap();
        let builder = local_builder().with_seconds_per_card(2);

        let run = builder.build(TEST_DOC, None, dir.path()).await.unwrap();

        let manifest = std::fs::read_to_string(&run.manifest).unwrap();
        assert_eq!(manifest.matches("duration 2").count(), 3);
        assert!(manifest.ends_with("file 'card_02.png'\n"));
    }
}
