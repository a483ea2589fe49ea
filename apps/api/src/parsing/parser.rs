//! Resume Parser — sequences text extraction, field extraction and entity
//! annotation into one `ParsedResume`.
//!
//! `parse` never panics or raises past its boundary: every outcome is either
//! a record or a `ParseError` whose message is shown to the caller.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::capabilities::{group_entities, EntityAnnotator};
use crate::extraction::text::panic_message;
use crate::extraction::{
    count_words, extract_contact_info, extract_education, extract_experience_years, extract_text,
    DocumentKind, SkillVocabulary,
};
use crate::models::ParsedResume;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type")]
    UnsupportedFileType,

    #[error("Could not extract text from file")]
    NoText,

    #[error("{0}")]
    Unexpected(String),
}

impl From<JoinError> for ParseError {
    fn from(e: JoinError) -> Self {
        if e.is_panic() {
            ParseError::Unexpected(panic_message(e.into_panic().as_ref()))
        } else {
            ParseError::Unexpected(e.to_string())
        }
    }
}

/// Shared, read-only parser. Cloning is cheap.
#[derive(Clone)]
pub struct ResumeParser {
    vocabulary: Arc<SkillVocabulary>,
    annotator: Arc<dyn EntityAnnotator>,
}

impl ResumeParser {
    pub fn new(vocabulary: Arc<SkillVocabulary>, annotator: Arc<dyn EntityAnnotator>) -> Self {
        Self {
            vocabulary,
            annotator,
        }
    }

    /// Parses one document. `declared_type` is the upload's file extension.
    pub async fn parse(
        &self,
        bytes: Bytes,
        declared_type: &str,
    ) -> Result<ParsedResume, ParseError> {
        let parse_id = Uuid::new_v4();
        let kind =
            DocumentKind::from_declared(declared_type).ok_or(ParseError::UnsupportedFileType)?;

        let vocabulary = Arc::clone(&self.vocabulary);
        let mut resume =
            tokio::task::spawn_blocking(move || extract_resume(&bytes, kind, &vocabulary)).await??;

        if self.annotator.is_available() {
            match self.annotator.annotate(&resume.raw_text).await {
                Ok(spans) => resume.entities = Some(group_entities(&spans)),
                Err(e) => warn!(%parse_id, "Entity annotation failed, omitting entities: {e}"),
            }
        }

        info!(
            %parse_id,
            ?kind,
            words = resume.word_count,
            skills = resume.skills.len(),
            education = resume.education.len(),
            experience_years = resume.experience_years,
            "Parsed resume"
        );
        Ok(resume)
    }
}

/// The CPU-bound part of parsing: decode, then run every rule-based
/// extraction over the same text.
fn extract_resume(
    bytes: &[u8],
    kind: DocumentKind,
    vocabulary: &SkillVocabulary,
) -> Result<ParsedResume, ParseError> {
    let text = extract_text(bytes, kind);
    if text.trim().is_empty() {
        return Err(ParseError::NoText);
    }

    Ok(ParsedResume {
        contact_info: extract_contact_info(&text),
        skills: vocabulary.extract(&text),
        education: extract_education(&text),
        experience_years: extract_experience_years(&text),
        word_count: count_words(&text),
        entities: None,
        raw_text: text,
    })
}
