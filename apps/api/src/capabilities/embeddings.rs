//! Sentence embeddings from an OpenAI-compatible `/embeddings` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CapabilityError, Embedder};
use crate::config::EmbeddingSettings;

const PROBE_TEXT: &str = "capability probe";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbedder {
    /// Creates the embedder and embeds a probe sentence; the embedder is
    /// only handed out if the backend returns a non-empty vector.
    pub async fn connect(
        client: Client,
        settings: &EmbeddingSettings,
    ) -> Result<Self, CapabilityError> {
        let embedder = Self {
            client,
            endpoint: format!("{}/embeddings", settings.api_url.trim_end_matches('/')),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        };
        embedder.embed(PROBE_TEXT).await?;
        Ok(embedder)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn is_available(&self) -> bool {
        true
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: [text],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| CapabilityError::Malformed("response contained no embeddings".into()))?;

        if embedding.is_empty() {
            return Err(CapabilityError::Malformed("embedding vector is empty".into()));
        }
        Ok(embedding)
    }
}
