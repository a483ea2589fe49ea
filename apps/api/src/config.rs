use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
const DEFAULT_CAPABILITY_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Everything has a default; optional capabilities stay off when unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// External skill vocabulary; the built-in list is used when unset.
    pub skills_vocabulary_path: Option<PathBuf>,
    pub ner_api_url: Option<String>,
    pub embedding: Option<EmbeddingSettings>,
    pub capability_timeout: Duration,
}

/// Connection settings for the embedding backend.
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedding = optional("EMBEDDING_API_URL").map(|api_url| EmbeddingSettings {
            api_url,
            api_key: optional("EMBEDDING_API_KEY"),
            model: optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        });

        Ok(Config {
            port: parse_or("PORT", optional("PORT"), DEFAULT_PORT)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                optional("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            skills_vocabulary_path: optional("SKILLS_VOCABULARY_PATH").map(PathBuf::from),
            ner_api_url: optional("NER_API_URL"),
            embedding,
            capability_timeout: Duration::from_secs(parse_or(
                "CAPABILITY_TIMEOUT_SECS",
                optional("CAPABILITY_TIMEOUT_SECS"),
                DEFAULT_CAPABILITY_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
