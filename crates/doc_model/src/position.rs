//! Positions and selections within the document

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// A position in the document tree
///
/// Offsets are counted in grapheme clusters. A position may address a text
/// node directly or a block node with a block-relative offset; the tree
/// resolves the latter onto the containing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The node containing this position
    pub node_id: NodeId,
    /// Grapheme offset within the node
    pub offset: usize,
}

impl Position {
    /// Create a new position
    pub fn new(node_id: NodeId, offset: usize) -> Self {
        Self { node_id, offset }
    }

    /// Create a position at the start of a node
    pub fn start_of(node_id: NodeId) -> Self {
        Self { node_id, offset: 0 }
    }
}

/// A selection in the document
///
/// A selection has an anchor (where the selection started) and a focus
/// (where the caret is). When anchor == focus the selection is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the selection ends (caret position)
    pub focus: Position,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret only)
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    /// Create a selection at the start of a node
    pub fn at_start_of(node_id: NodeId) -> Self {
        Self::collapsed(Position::start_of(node_id))
    }

    /// Check if this selection is collapsed (just a caret)
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Get the start position, assuming both ends share a node
    pub fn start(&self) -> Position {
        if self.anchor.node_id == self.focus.node_id && self.focus.offset < self.anchor.offset {
            self.focus
        } else {
            self.anchor
        }
    }

    /// Get the end position, assuming both ends share a node
    pub fn end(&self) -> Position {
        if self.anchor.node_id == self.focus.node_id && self.focus.offset < self.anchor.offset {
            self.anchor
        } else {
            self.focus
        }
    }

    /// Move the focus, extending the selection
    pub fn extend_to(&self, focus: Position) -> Self {
        Self {
            anchor: self.anchor,
            focus,
        }
    }

    /// Collapse the selection to the focus position
    pub fn collapse_to_focus(&self) -> Self {
        Self::collapsed(self.focus)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::collapsed(Position::new(NodeId::new(), 0))
    }
}
