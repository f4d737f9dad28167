use crate::config::Config;
use crate::render::CardSequenceBuilder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Font book and bullet strategy, built once at startup and shared by every run.
    pub cards: CardSequenceBuilder,
}
