mod bullets;
mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod routes;
mod state;
mod summary;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bullets::BulletExtractor;
use crate::config::Config;
use crate::layout::FontBook;
use crate::render::CardSequenceBuilder;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed numeric values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cardgen v{}", env!("CARGO_PKG_VERSION"));

    // Font book: one face for every card of every run; missing fonts degrade, never fail
    let fonts = Arc::new(FontBook::load(&config.font_candidates));
    match fonts.source() {
        Some(path) => info!(font = %path.display(), "Font book ready"),
        None => info!(fallback = fonts.is_fallback(), "Font book ready without a face"),
    }

    // Bullet strategy is fixed here, once, from the presence of an API key
    let extractor = BulletExtractor::from_config(&config)?;
    info!(
        strategy = extractor.strategy_name(),
        model = %config.gemini_model,
        "Bullet extractor initialized"
    );

    let cards = CardSequenceBuilder::new(fonts, extractor)
        .with_seconds_per_card(config.seconds_per_card);
    info!(dir = %config.output_dir.display(), "Cards will be written under output dir");

    let state = AppState {
        config: config.clone(),
        cards,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
