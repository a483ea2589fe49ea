// Records exchanged with callers. Parsing produces `ParsedResume`; matching
// consumes it together with `JobRequirements` and produces `MatchResult`.

pub mod job;
pub mod resume;

pub use job::{JobRequirements, MatchResult};
pub use resume::{ContactInfo, EducationEntry, Entities, ParsedResume};
