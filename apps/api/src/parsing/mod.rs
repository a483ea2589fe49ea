pub mod handlers;
pub mod parser;

pub use parser::{ParseError, ResumeParser};
