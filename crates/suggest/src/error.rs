//! Error types for the suggestion subsystem

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Provider request failed: {0}")]
    ProviderFailed(String),

    #[error("Suggestion instance was cancelled")]
    Cancelled,

    #[error("Item does not match the trigger kind")]
    ItemMismatch,

    #[error("Edit error: {0}")]
    Edit(#[from] edit_engine::EditError),
}

pub type Result<T> = std::result::Result<T, SuggestError>;
