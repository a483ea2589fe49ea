mod capabilities;
mod config;
mod errors;
mod extraction;
mod matching;
mod models;
mod parsing;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::extraction::SkillVocabulary;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-ai v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = match &config.skills_vocabulary_path {
        Some(path) => SkillVocabulary::load(path)
            .with_context(|| format!("loading skill vocabulary from {}", path.display()))?,
        None => SkillVocabulary::builtin()?,
    };
    info!("Skill vocabulary loaded ({} terms)", vocabulary.len());

    // Optional models; missing ones degrade their features instead of failing startup
    let capabilities = Capabilities::load(&config).await;
    info!(
        "Capabilities: entity_annotator={} embedding_model={}",
        capabilities.annotator.is_available(),
        capabilities.embedder.is_available()
    );

    let state = AppState::new(config.clone(), vocabulary, capabilities);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
