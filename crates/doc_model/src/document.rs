//! Document root node and document-level state

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Document metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// The root document node
///
/// Holds the ordered top-level body children and a version counter that
/// increments on every committed change. Derived layers (decorations,
/// heading ids) compare against the version to detect staleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: NodeId,
    /// IDs of top-level body children (paragraphs, headings, citations, ...)
    body_children: Vec<NodeId>,
    /// Metadata
    pub metadata: DocumentMetadata,
    /// Version counter for tracking committed changes
    version: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            body_children: Vec::new(),
            metadata: DocumentMetadata::default(),
            version: 0,
        }
    }

    /// Get the root node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increment the version after a committed change
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    /// Get the ordered body children
    pub fn children(&self) -> &[NodeId] {
        &self.body_children
    }

    /// Add a child to the end of the body
    pub fn add_body_child(&mut self, child_id: NodeId) {
        self.body_children.push(child_id);
    }

    /// Insert a child at a specific index
    pub fn insert_body_child(&mut self, index: usize, child_id: NodeId) {
        self.body_children.insert(index, child_id);
    }

    /// Remove a child by ID; returns false if not present
    pub fn remove_body_child(&mut self, child_id: NodeId) -> bool {
        if let Some(pos) = self.body_children.iter().position(|&id| id == child_id) {
            self.body_children.remove(pos);
            true
        } else {
            false
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
