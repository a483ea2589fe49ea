// Document decoding and rule-based field extraction.
// Everything here is synchronous and CPU-bound; async callers run it inside
// tokio::task::spawn_blocking.

pub mod fields;
pub mod skills;
pub mod text;

pub use fields::{count_words, extract_contact_info, extract_education, extract_experience_years};
pub use skills::SkillVocabulary;
pub use text::{extract_text, DocumentKind};
