use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// First email, phone number and LinkedIn profile path found in the document.
/// Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Full matched `linkedin.com/in/<handle>` text, prefix included.
    pub linkedin_handle: Option<String>,
}

/// One line that mentions a degree, school or certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree_line: String,
    /// The matched line plus its neighbours, joined by spaces.
    pub context: String,
}

/// Named entities contributed by the entity annotator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    pub persons: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
}

/// Normalized output of one resume document.
///
/// `entities` is `None` when no annotator was available, which callers must
/// read as "unknown" rather than "none found"; it is omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub raw_text: String,
    pub contact_info: ContactInfo,
    pub skills: BTreeSet<String>,
    pub education: Vec<EducationEntry>,
    pub experience_years: u32,
    pub word_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Entities>,
}
