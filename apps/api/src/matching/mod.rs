pub mod handlers;
pub mod matcher;

pub use matcher::{JobMatcher, MatchError};
