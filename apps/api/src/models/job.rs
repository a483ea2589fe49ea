use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Caller-supplied description of a job's skill and experience needs.
/// Missing fields default to empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub description: String,
    pub requirements: String,
    pub experience_years: u32,
}

/// Scored comparison of one parsed resume against one job.
/// All scores are percentages in `[0, 100]`, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    pub skill_match: f64,
    pub semantic_match: f64,
    pub experience_match: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub experience_gap: u32,
}

impl JobRequirements {
    /// Text embedded for semantic comparison: description and requirements
    /// joined by a single space.
    pub fn semantic_text(&self) -> String {
        format!("{} {}", self.description, self.requirements)
    }
}
