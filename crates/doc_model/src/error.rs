//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Invalid position: node {node_id}, offset {offset}")]
    InvalidPosition { node_id: Uuid, offset: usize },

    #[error("Invalid tree structure: {0}")]
    InvalidStructure(String),

    #[error("Malformed element: {0}")]
    MalformedElement(String),

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
