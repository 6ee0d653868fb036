//! Error types for the glossary highlighter

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("Could not compile term pattern: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, GlossaryError>;
