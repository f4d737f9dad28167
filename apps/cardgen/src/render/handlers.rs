//! Axum route handlers for the Cards API.

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::{Card, CardKind};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderCardsRequest {
    pub markdown: String,
    #[serde(default)]
    pub channel_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CardEntry {
    pub index: usize,
    #[serde(flatten)]
    pub kind: CardKind,
    pub label: String,
    pub file: String,
    pub line_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct RenderCardsResponse {
    pub job_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub bullet_strategy: &'static str,
    pub cards: Vec<CardEntry>,
    pub manifest: String,
}

#[derive(Debug, Serialize)]
pub struct CardListResponse {
    pub job_id: Uuid,
    pub files: Vec<String>,
}

impl From<&Card> for CardEntry {
    fn from(card: &Card) -> Self {
        Self {
            index: card.index,
            kind: card.kind,
            label: card.label.clone(),
            file: file_name(&card.path),
            line_count: card.lines.len(),
            truncated: card.truncated,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cards
///
/// Renders one summary document into a fresh job directory and returns the
/// ordered card list. An empty document still produces the title card.
pub async fn handle_render_cards(
    State(state): State<AppState>,
    Json(request): Json<RenderCardsRequest>,
) -> Result<Json<RenderCardsResponse>, AppError> {
    let job_id = Uuid::new_v4();
    let output_dir = state.config.output_dir.join(job_id.to_string());

    let run = state
        .cards
        .build(&request.markdown, request.channel_name.as_deref(), &output_dir)
        .await?;

    Ok(Json(RenderCardsResponse {
        job_id,
        generated_at: Utc::now(),
        title: run.title,
        bullet_strategy: state.cards.extractor().strategy_name(),
        cards: run.cards.iter().map(CardEntry::from).collect(),
        manifest: file_name(&run.manifest),
    }))
}

/// GET /api/v1/cards/:job_id
///
/// Lists the card images of a finished job in display order.
pub async fn handle_list_cards(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<CardListResponse>, AppError> {
    let job_id = Uuid::parse_str(&job_id)
        .map_err(|_| AppError::Validation(format!("'{job_id}' is not a valid job id")))?;
    let dir = state.config.output_dir.join(job_id.to_string());

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Job {job_id} not found")));
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("card_") && name.ends_with(".png") {
            files.push(name);
        }
    }
    files.sort();

    Ok(Json(CardListResponse { job_id, files }))
}

fn file_name(path: &FsPath) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
