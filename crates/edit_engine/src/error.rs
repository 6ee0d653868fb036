//! Error types for editing operations

use doc_model::DocModelError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid position: node {node_id}, offset {offset}")]
    InvalidPosition { node_id: Uuid, offset: usize },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Alternate reading requires at least one version")]
    EmptyVersionsSet,

    #[error("Document model error: {0}")]
    DocModel(DocModelError),
}

impl From<DocModelError> for EditError {
    fn from(e: DocModelError) -> Self {
        match e {
            DocModelError::InvalidPosition { node_id, offset } => {
                EditError::InvalidPosition { node_id, offset }
            }
            other => EditError::DocModel(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
