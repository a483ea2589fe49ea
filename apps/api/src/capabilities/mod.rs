//! Optional model capabilities: entity annotation and sentence embeddings.
//!
//! Each capability is an injected trait object carried in `AppState`.
//! Callers ask `is_available()` up front instead of null-checking a global.
//! Capabilities are built once at startup and never mutated afterwards, so
//! concurrent requests share them without locking.

pub mod embeddings;
pub mod ner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub use embeddings::OpenAiEmbedder;
pub use ner::{group_entities, EntitySpan, HttpEntityAnnotator};

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability is not loaded")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Named-entity recognition over free text.
#[async_trait]
pub trait EntityAnnotator: Send + Sync {
    fn is_available(&self) -> bool;

    async fn annotate(&self, text: &str) -> Result<Vec<EntitySpan>, CapabilityError>;
}

/// Sentence embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn is_available(&self) -> bool;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError>;
}

/// Stand-in for a capability that failed to load or was never configured.
pub struct Unavailable;

#[async_trait]
impl EntityAnnotator for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn annotate(&self, _text: &str) -> Result<Vec<EntitySpan>, CapabilityError> {
        Err(CapabilityError::Unavailable)
    }
}

#[async_trait]
impl Embedder for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, CapabilityError> {
        Err(CapabilityError::Unavailable)
    }
}

/// The set of optional capabilities resolved at process start.
#[derive(Clone)]
pub struct Capabilities {
    pub annotator: Arc<dyn EntityAnnotator>,
    pub embedder: Arc<dyn Embedder>,
}

impl Capabilities {
    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self {
            annotator: Arc::new(Unavailable),
            embedder: Arc::new(Unavailable),
        }
    }

    /// Builds and probes every configured backend. A backend that is not
    /// configured or fails its probe is left unavailable; loading never fails.
    pub async fn load(config: &Config) -> Self {
        let annotator: Arc<dyn EntityAnnotator> = match load_annotator(config).await {
            Ok(Some(annotator)) => Arc::new(annotator),
            Ok(None) => {
                info!("NER_API_URL not set; entity annotation disabled");
                Arc::new(Unavailable)
            }
            Err(e) => {
                warn!("Entity annotator unavailable: {e}");
                Arc::new(Unavailable)
            }
        };

        let embedder: Arc<dyn Embedder> = match load_embedder(config).await {
            Ok(Some(embedder)) => Arc::new(embedder),
            Ok(None) => {
                info!("EMBEDDING_API_URL not set; semantic matching disabled");
                Arc::new(Unavailable)
            }
            Err(e) => {
                warn!("Embedding model unavailable: {e}");
                Arc::new(Unavailable)
            }
        };

        Self {
            annotator,
            embedder,
        }
    }

    /// True only when every optional capability is available.
    pub fn all_loaded(&self) -> bool {
        self.annotator.is_available() && self.embedder.is_available()
    }
}

async fn load_annotator(config: &Config) -> Result<Option<HttpEntityAnnotator>, CapabilityError> {
    let Some(url) = &config.ner_api_url else {
        return Ok(None);
    };
    let client = http_client(config.capability_timeout)?;
    let annotator = HttpEntityAnnotator::connect(client, url.clone()).await?;
    info!("Entity annotator loaded ({url})");
    Ok(Some(annotator))
}

async fn load_embedder(config: &Config) -> Result<Option<OpenAiEmbedder>, CapabilityError> {
    let Some(settings) = &config.embedding else {
        return Ok(None);
    };
    let client = http_client(config.capability_timeout)?;
    let embedder = OpenAiEmbedder::connect(client, settings).await?;
    info!("Embedding model loaded ({})", settings.model);
    Ok(Some(embedder))
}

fn http_client(timeout: Duration) -> Result<Client, CapabilityError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Serves a stub backend on an ephemeral local port for client tests.
#[cfg(test)]
pub(crate) async fn serve_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
