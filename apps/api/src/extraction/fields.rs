//! Pattern rules for contact info, education lines and years of experience.
//!
//! Each extraction reads the full document text and is independent of the
//! others.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ContactInfo, EducationEntry};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("email pattern")
});

// North American 3-3-4 grouping with optional +1 and separators.
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")
        .expect("phone pattern")
});

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)linkedin\.com/(?:in|pub)/[A-Za-z0-9\-.]+").expect("linkedin pattern")
});

static EXPERIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+)\+?\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)")
        .expect("experience pattern")
});

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "mba",
    "bs",
    "ba",
    "ms",
    "ma",
    "bsc",
    "msc",
    "degree",
    "university",
    "college",
    "institute",
    "certification",
    "certified",
    "diploma",
    "associate",
];

static EDUCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", EDUCATION_KEYWORDS.join("|")))
        .expect("education pattern")
});

/// First email, phone and LinkedIn path in document order. Later
/// occurrences are ignored.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: first_match(&EMAIL, text),
        phone: first_match(&PHONE, text),
        linkedin_handle: first_match(&LINKEDIN, text),
    }
}

fn first_match(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().to_string())
}

/// One entry per line mentioning an education keyword, in line order.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let lines: Vec<&str> = text.split('\n').collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| EDUCATION.is_match(line))
        .map(|(i, line)| {
            let from = i.saturating_sub(1);
            let to = (i + 2).min(lines.len());
            EducationEntry {
                degree_line: line.trim().to_string(),
                context: lines[from..to].join(" "),
            }
        })
        .collect()
}

/// Largest "<N> years of experience" figure stated anywhere, or 0.
///
/// Resumes repeat tenure in the summary and per role; the maximum wins so a
/// stale partial mention does not undercount.
pub fn extract_experience_years(text: &str) -> u32 {
    EXPERIENCE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Whitespace-separated token count.
pub fn count_words(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}
