//! Closed-vocabulary skill matcher.
//!
//! Only terms present in the vocabulary are ever reported. The vocabulary is
//! built in, or loaded from a plain-text file (one term per line, lines
//! starting with `#` ignored) so it can grow without a rebuild.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use aho_corasick::AhoCorasick;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read skill vocabulary {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("skill vocabulary contains no terms")]
    Empty,

    #[error("failed to build skill matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

/// A fixed set of lowercase skill terms plus the automaton that finds them.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<String>,
    matcher: AhoCorasick,
}

impl SkillVocabulary {
    /// Builds a vocabulary from arbitrary terms. Terms are trimmed and
    /// lowercased; blanks and duplicates are dropped.
    pub fn new<I, S>(terms: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();

        if terms.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let matcher = AhoCorasick::new(&terms)?;

        Ok(Self { terms, matcher })
    }

    /// The vocabulary shipped with the service.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::new(DEFAULT_SKILLS)
    }

    /// Parses the line-oriented vocabulary format.
    pub fn from_source(source: &str) -> Result<Self, VocabularyError> {
        Self::new(
            source
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Loads a vocabulary file from disk.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let source = std::fs::read_to_string(path).map_err(|source| VocabularyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let vocabulary = Self::from_source(&source)?;
        info!(
            "Loaded {} skill terms from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every distinct vocabulary term occurring in `text` as a whole word,
    /// case-insensitively, in lowercase.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        // Terms are stored lowercase; fold the text the same way so
        // non-ASCII letters compare equal too.
        let text = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&text)
            .filter(|m| is_whole_word(&text, m.start(), m.end()))
            .map(|m| self.terms[m.pattern().as_usize()].clone())
            .collect()
    }
}

/// True when neither neighbour of `text[start..end]` is a word character.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

const DEFAULT_SKILLS: &[&str] = &[
    // languages & frameworks
    "python", "javascript", "java", "typescript", "html", "css", "php", "ruby", "go", "rust",
    "swift", "kotlin", "c++", "c#", "scala", "r", "matlab", "react", "node.js", "nodejs",
    "angular", "vue", "flask", "django", "spring", "laravel", "express",
    // data & ml
    "sql", "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "machine learning",
    "deep learning", "neural networks", "ai", "nlp", "computer vision", "tensorflow",
    "pytorch", "scikit-learn", "pandas", "numpy", "jupyter", "big data", "data science",
    "data analysis", "business intelligence", "tableau", "power bi", "looker",
    // infrastructure & tooling
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "puppet", "chef",
    "vagrant", "git", "github", "gitlab", "jenkins", "ci/cd", "devops", "linux", "windows",
    "macos", "apache", "nginx", "serverless", "lambda", "microservices", "api", "rest",
    "graphql", "maven", "gradle", "npm", "pip", "conda", "cloud computing", "networking",
    // security & compliance
    "security", "encryption", "cybersecurity", "penetration testing", "ethical hacking",
    "incident response", "risk management", "audit", "compliance", "governance", "gdpr",
    "hipaa", "sox", "pci", "iso",
    // engineering practice
    "agile", "scrum", "lean", "six sigma", "testing", "debugging", "troubleshooting",
    "optimization", "performance", "quality assurance", "automation", "integration",
    "workflow", "business process", "api development", "mobile development",
    "web development", "game development", "frontend", "backend", "fullstack", "database",
    "robotics", "iot", "blockchain", "cryptocurrency",
    // productivity tools
    "jira", "confluence", "slack", "teams", "excel", "powerpoint", "word",
    // design
    "ux", "ui", "design", "figma", "sketch", "adobe", "photoshop", "illustrator",
    "after effects", "premiere", "final cut", "blender", "unity", "unreal",
    // business & marketing
    "project management", "product management", "brand management", "sales", "marketing",
    "finance", "accounting", "hr", "legal", "operations", "supply chain", "logistics",
    "customer service", "salesforce", "hubspot", "marketo", "mailchimp", "google analytics",
    "facebook ads", "google ads", "seo", "sem", "social media", "content marketing",
    "email marketing", "affiliate marketing", "influencer marketing", "fintech", "edtech",
    "healthcare", "biotech", "ecommerce", "saas", "b2b", "b2c",
    // soft skills
    "leadership", "communication", "problem solving", "teamwork", "analytical thinking",
    "creativity", "time management", "adaptability", "critical thinking",
];
