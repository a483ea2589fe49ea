//! Entity annotator backed by an HTTP named-entity service.
//!
//! The service takes `{"text": ...}` and answers with spaCy-style labeled
//! spans: `{"entities": [{"text": "Ada Lovelace", "label": "PERSON"}, ...]}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CapabilityError, EntityAnnotator};
use crate::models::Entities;

const PROBE_TEXT: &str = "Ada Lovelace worked in London.";

/// One labeled span returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    entities: Vec<EntitySpan>,
}

pub struct HttpEntityAnnotator {
    client: Client,
    url: String,
}

impl HttpEntityAnnotator {
    /// Creates the annotator and runs one probe request; the annotator is
    /// only handed out if the backend answers correctly.
    pub async fn connect(client: Client, url: String) -> Result<Self, CapabilityError> {
        let annotator = Self { client, url };
        annotator.annotate(PROBE_TEXT).await?;
        Ok(annotator)
    }
}

#[async_trait]
impl EntityAnnotator for HttpEntityAnnotator {
    fn is_available(&self) -> bool {
        true
    }

    async fn annotate(&self, text: &str) -> Result<Vec<EntitySpan>, CapabilityError> {
        let response = self
            .client
            .post(&self.url)
            .json(&AnnotateRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body: AnnotateResponse = response.json().await?;
        debug!(spans = body.entities.len(), "Entity annotation complete");
        Ok(body.entities)
    }
}

/// Sorts spans into persons (`PERSON`), organizations (`ORG`) and locations
/// (`GPE`, `LOC`). Span order and duplicates are kept; other labels dropped.
pub fn group_entities(spans: &[EntitySpan]) -> Entities {
    let mut entities = Entities::default();
    for span in spans {
        match span.label.as_str() {
            "PERSON" => entities.persons.push(span.text.clone()),
            "ORG" => entities.organizations.push(span.text.clone()),
            "GPE" | "LOC" => entities.locations.push(span.text.clone()),
            _ => {}
        }
    }
    entities
}
