use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::extraction::SkillVocabulary;
use crate::matching::JobMatcher;
use crate::parsing::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub parser: ResumeParser,
    pub matcher: JobMatcher,
    /// Reported by `/health`. The parser and matcher hold their own handles.
    pub capabilities: Capabilities,
}

impl AppState {
    pub fn new(config: Config, vocabulary: SkillVocabulary, capabilities: Capabilities) -> Self {
        Self {
            config,
            parser: ResumeParser::new(Arc::new(vocabulary), capabilities.annotator.clone()),
            matcher: JobMatcher::new(capabilities.embedder.clone()),
            capabilities,
        }
    }
}
