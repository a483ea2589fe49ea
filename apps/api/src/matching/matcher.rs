//! Job Matcher — scores a parsed resume against job requirements on three
//! independent axes and blends them into one score.
//!
//! Algorithm:
//! 1. job skills = lowercase(required ∪ preferred)
//! 2. skill match = |resume ∩ job| / |job| × 100, or 0 with no job skills
//! 3. semantic match = cosine(embed(resume), embed(job text)) × 100, or 0
//!    when the embedding model is unavailable or fails
//! 4. experience match = min(100, candidate / max(required, 1) × 100)
//! 5. overall = 0.4 × skill + 0.4 × semantic + 0.2 × experience
//!
//! Every score is rounded to two decimals and the overall score is computed
//! from the rounded components, so the reported numbers always add up.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::capabilities::Embedder;
use crate::models::{JobRequirements, MatchResult, ParsedResume};

const SKILL_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.4;
const EXPERIENCE_WEIGHT: f64 = 0.2;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    Unexpected(String),
}

/// Shared, read-only matcher. Cloning is cheap.
#[derive(Clone)]
pub struct JobMatcher {
    embedder: Arc<dyn Embedder>,
}

impl JobMatcher {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub async fn match_resume(
        &self,
        resume: &ParsedResume,
        job: &JobRequirements,
    ) -> Result<MatchResult, MatchError> {
        let job_skills = normalize_skills(job.required_skills.iter().chain(&job.preferred_skills));
        let resume_skills = normalize_skills(&resume.skills);

        let skill_match = round2(skill_match(&resume_skills, &job_skills));
        let semantic_match = round2(
            self.semantic_match(&resume.raw_text, &job.semantic_text())
                .await,
        );
        let experience_match = round2(experience_match(
            resume.experience_years,
            job.experience_years,
        ));
        let overall_score = overall_score(skill_match, semantic_match, experience_match);

        if !overall_score.is_finite() {
            return Err(MatchError::Unexpected(format!(
                "non-finite score (skill={skill_match}, semantic={semantic_match}, \
                 experience={experience_match})"
            )));
        }

        debug!(
            overall_score,
            skill_match, semantic_match, experience_match, "Scored resume against job"
        );

        Ok(MatchResult {
            overall_score,
            skill_match,
            semantic_match,
            experience_match,
            matched_skills: resume_skills.intersection(&job_skills).cloned().collect(),
            missing_skills: job_skills.difference(&resume_skills).cloned().collect(),
            experience_gap: job.experience_years.saturating_sub(resume.experience_years),
        })
    }

    /// Cosine similarity of the two texts' embeddings as a percentage.
    /// Degrades to 0 rather than failing the match.
    async fn semantic_match(&self, resume_text: &str, job_text: &str) -> f64 {
        if !self.embedder.is_available() {
            return 0.0;
        }

        let embeddings = tokio::try_join!(
            self.embedder.embed(resume_text),
            self.embedder.embed(job_text)
        );
        let (resume_vec, job_vec) = match embeddings {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Embedding failed, semantic match set to 0: {e}");
                return 0.0;
            }
        };

        match cosine_similarity(&resume_vec, &job_vec) {
            Some(similarity) => (similarity * 100.0).clamp(0.0, 100.0),
            None => {
                warn!(
                    resume_dims = resume_vec.len(),
                    job_dims = job_vec.len(),
                    "Embeddings not comparable, semantic match set to 0"
                );
                0.0
            }
        }
    }
}

/// Trims and lowercases skills, dropping blanks.
fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn skill_match(resume_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let matched = resume_skills.intersection(job_skills).count();
    matched as f64 / job_skills.len() as f64 * 100.0
}

/// Zero required years counts as one, so any experience can satisfy it.
fn experience_match(candidate_years: u32, required_years: u32) -> f64 {
    let required = required_years.max(1) as f64;
    (candidate_years as f64 / required * 100.0).min(100.0)
}

fn overall_score(skill: f64, semantic: f64, experience: f64) -> f64 {
    round2(SKILL_WEIGHT * skill + SEMANTIC_WEIGHT * semantic + EXPERIENCE_WEIGHT * experience)
}

/// `None` when the vectors differ in length, are empty, or have zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum();
    let norm_a = a.iter().map(|&x| (x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|&x| (x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::capabilities::{CapabilityError, Unavailable};

    /// Maps the resume text to one vector and everything else to another.
    struct FixedEmbedder {
        resume: Vec<f32>,
        job: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn is_available(&self) -> bool {
            true
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
            if text.starts_with("RESUME") {
                Ok(self.resume.clone())
            } else {
                Ok(self.job.clone())
            }
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn is_available(&self) -> bool {
            true
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, CapabilityError> {
            Err(CapabilityError::Backend {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn offline() -> JobMatcher {
        JobMatcher::new(Arc::new(Unavailable))
    }

    fn with_vectors(resume: Vec<f32>, job: Vec<f32>) -> JobMatcher {
        JobMatcher::new(Arc::new(FixedEmbedder { resume, job }))
    }

    fn resume(skills: &[&str], years: u32) -> ParsedResume {
        ParsedResume {
            raw_text: "RESUME text".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: years,
            ..Default::default()
        }
    }

    fn job(required: &[&str], preferred: &[&str], years: u32) -> JobRequirements {
        JobRequirements {
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            description: "Backend role".to_string(),
            requirements: "Python and SQL".to_string(),
            experience_years: years,
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn assert_overall_consistent(result: &MatchResult) {
        let expected = round2(
            0.4 * result.skill_match + 0.4 * result.semantic_match + 0.2 * result.experience_match,
        );
        assert_eq!(result.overall_score, expected);
    }

    #[tokio::test]
    async fn test_worked_example_skill_overlap() {
        let result = offline()
            .match_resume(&resume(&["python", "sql"], 3), &job(&["python", "aws"], &["sql"], 3))
            .await
            .unwrap();

        assert_eq!(result.skill_match, 66.67);
        assert_eq!(result.matched_skills, set(&["python", "sql"]));
        assert_eq!(result.missing_skills, set(&["aws"]));
        assert_eq!(result.semantic_match, 0.0);
        assert_eq!(result.experience_match, 100.0);
        assert_eq!(result.overall_score, 46.67);
        assert_overall_consistent(&result);
    }

    #[tokio::test]
    async fn test_empty_job_skills_scores_zero() {
        let result = offline()
            .match_resume(&resume(&["python"], 2), &job(&[], &[], 2))
            .await
            .unwrap();
        assert_eq!(result.skill_match, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_job_skills_case_insensitive_and_deduplicated() {
        let result = offline()
            .match_resume(
                &resume(&["python"], 0),
                &job(&["Python", " AWS "], &["python", ""], 0),
            )
            .await
            .unwrap();
        assert_eq!(result.skill_match, 50.0);
        assert_eq!(result.matched_skills, set(&["python"]));
        assert_eq!(result.missing_skills, set(&["aws"]));
    }

    #[tokio::test]
    async fn test_zero_required_years_caps_at_100() {
        let result = offline()
            .match_resume(&resume(&[], 5), &job(&[], &[], 0))
            .await
            .unwrap();
        assert_eq!(result.experience_match, 100.0);
        assert_eq!(result.experience_gap, 0);
    }

    #[tokio::test]
    async fn test_zero_required_and_zero_candidate() {
        let result = offline()
            .match_resume(&resume(&[], 0), &job(&[], &[], 0))
            .await
            .unwrap();
        assert_eq!(result.experience_match, 0.0);
        assert_eq!(result.overall_score, 0.0);
    }

    #[tokio::test]
    async fn test_experience_shortfall_reports_gap() {
        let result = offline()
            .match_resume(&resume(&[], 2), &job(&[], &[], 8))
            .await
            .unwrap();
        assert_eq!(result.experience_match, 25.0);
        assert_eq!(result.experience_gap, 6);
    }

    #[tokio::test]
    async fn test_semantic_match_from_embeddings() {
        let matcher = with_vectors(vec![1.0, 0.0], vec![1.0, 1.0]);
        let result = matcher
            .match_resume(&resume(&["python"], 5), &job(&["python"], &[], 5))
            .await
            .unwrap();
        // cos 45° = 0.7071
        assert_eq!(result.semantic_match, 70.71);
        assert_eq!(result.overall_score, round2(0.4 * 100.0 + 0.4 * 70.71 + 0.2 * 100.0));
        assert_overall_consistent(&result);
    }

    #[tokio::test]
    async fn test_negative_similarity_clamped_to_zero() {
        let matcher = with_vectors(vec![1.0, 0.0], vec![-1.0, 0.0]);
        let result = matcher
            .match_resume(&resume(&[], 1), &job(&[], &[], 1))
            .await
            .unwrap();
        assert_eq!(result.semantic_match, 0.0);
    }

    #[tokio::test]
    async fn test_mismatched_dimensions_degrade_to_zero() {
        let matcher = with_vectors(vec![1.0, 0.0, 0.0], vec![1.0, 0.0]);
        let result = matcher
            .match_resume(&resume(&[], 1), &job(&[], &[], 1))
            .await
            .unwrap();
        assert_eq!(result.semantic_match, 0.0);
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_zero() {
        let matcher = JobMatcher::new(Arc::new(FailingEmbedder));
        let result = matcher
            .match_resume(&resume(&["python"], 1), &job(&["python"], &[], 1))
            .await
            .unwrap();
        assert_eq!(result.semantic_match, 0.0);
        assert_eq!(result.skill_match, 100.0);
        assert_eq!(result.overall_score, 60.0);
    }

    #[tokio::test]
    async fn test_overall_score_consistent_across_inputs() {
        let matcher = with_vectors(vec![0.3, 0.9, 0.1], vec![0.5, 0.2, 0.7]);
        for (skills, required, preferred, have, need) in [
            (vec!["python"], vec!["python", "aws", "sql"], vec![], 1, 7),
            (vec!["rust", "go"], vec!["go"], vec!["rust", "kafka"], 3, 3),
            (vec![], vec!["excel"], vec![], 0, 2),
            (vec!["sql"], vec![], vec!["sql"], 11, 3),
        ] {
            let result = matcher
                .match_resume(&resume(&skills, have), &job(&required, &preferred, need))
                .await
                .unwrap();
            assert_overall_consistent(&result);
            for score in [
                result.overall_score,
                result.skill_match,
                result.semantic_match,
                result.experience_match,
            ] {
                assert!((0.0..=100.0).contains(&score), "out of range: {score}");
            }
        }
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), None);
        let same = cosine_similarity(&[0.2, 0.4], &[0.2, 0.4]).unwrap();
        assert!((same - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.0), 0.0);
    }
}
