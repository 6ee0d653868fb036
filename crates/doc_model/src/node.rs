//! Core node types for the document tree

use crate::{AttrValue, Attributes, DocModelError, Mark, NodeId, Result};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Structural kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Block,
    Inline,
    Text,
}

/// Enumeration of all node types in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Paragraph,
    Heading,
    Blockquote,
    Text,
    /// Footnote or special note; atomic inline, payload in attributes
    Note,
    /// Reference to external scripture content; atomic block
    Citation,
    /// Image with independent alignment and width presentation attributes
    StyledImage,
}

impl NodeType {
    /// The stable name used in the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::Text => "text",
            NodeType::Note => "note",
            NodeType::Citation => "citation",
            NodeType::StyledImage => "styledImage",
        }
    }

    /// Whether nodes of this type are atomic: inserted, selected and deleted
    /// as an indivisible unit, never entered for child editing.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            NodeType::Note | NodeType::Citation | NodeType::StyledImage
        )
    }

    /// The default structural kind for this type
    pub fn default_kind(&self) -> NodeKind {
        match self {
            NodeType::Paragraph | NodeType::Heading | NodeType::Blockquote | NodeType::Citation => {
                NodeKind::Block
            }
            NodeType::Text => NodeKind::Text,
            NodeType::Note | NodeType::StyledImage => NodeKind::Inline,
        }
    }
}

/// A node in the document tree
///
/// All element types share this representation: the `node_type` selects the
/// semantics, the attribute map carries the payload. Text nodes hold their
/// content in `text` with a uniform mark set; a mark change over part of a
/// run splits the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    /// The element type of this node
    pub node_type: NodeType,
    /// Structural kind (block, inline, text)
    pub kind: NodeKind,
    /// Attribute payload
    pub attributes: Attributes,
    /// Ordered child node IDs; always empty for atomic and text nodes
    children: Vec<NodeId>,
    /// Marks applied to this run (text nodes only)
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Text content (text nodes only)
    #[serde(default)]
    pub text: String,
}

impl Node {
    /// Create a new node of the given type with its default kind
    pub fn new(node_type: NodeType) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            node_type,
            kind: node_type.default_kind(),
            attributes: Attributes::new(),
            children: Vec::new(),
            marks: Vec::new(),
            text: String::new(),
        }
    }

    /// Create a new node with attributes
    pub fn with_attributes(node_type: NodeType, attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Self::new(node_type)
        }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            ..Self::new(NodeType::Text)
        }
    }

    /// Create a text node with marks
    pub fn text_with_marks(content: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            text: content.into(),
            marks,
            ..Self::new(NodeType::Text)
        }
    }

    /// Create a paragraph block
    pub fn paragraph() -> Self {
        Self::new(NodeType::Paragraph)
    }

    /// Create a heading block of the given level (clamped to 1..=6)
    pub fn heading(level: u8) -> Self {
        let mut node = Self::new(NodeType::Heading);
        node.attributes
            .insert("level".to_string(), AttrValue::Int(level.clamp(1, 6) as i64));
        node
    }

    /// Create a blockquote block
    pub fn blockquote() -> Self {
        Self::new(NodeType::Blockquote)
    }

    /// Get the unique ID of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the ID of the parent node (None when detached or top-level)
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Set the parent node ID
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Get the IDs of child nodes
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node may carry children
    pub fn can_have_children(&self) -> bool {
        !self.node_type.is_atomic() && self.node_type != NodeType::Text
    }

    /// Append a child ID, enforcing the atomic-node invariant
    pub fn push_child(&mut self, child: NodeId) -> Result<()> {
        self.ensure_can_have_children()?;
        self.children.push(child);
        Ok(())
    }

    /// Insert a child ID at an index, enforcing the atomic-node invariant
    pub fn insert_child(&mut self, index: usize, child: NodeId) -> Result<()> {
        self.ensure_can_have_children()?;
        if index > self.children.len() {
            return Err(DocModelError::InvalidPosition {
                node_id: self.id.as_uuid(),
                offset: index,
            });
        }
        self.children.insert(index, child);
        Ok(())
    }

    /// Remove a child ID; returns false if not present
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        if let Some(pos) = self.children.iter().position(|&id| id == child) {
            self.children.remove(pos);
            true
        } else {
            false
        }
    }

    fn ensure_can_have_children(&self) -> Result<()> {
        if !self.can_have_children() {
            return Err(DocModelError::InvalidStructure(format!(
                "{} nodes cannot have children",
                self.node_type.name()
            )));
        }
        Ok(())
    }

    /// Get a string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(AttrValue::as_str)
    }

    /// Get an integer attribute
    pub fn attr_int(&self, key: &str) -> Option<i64> {
        self.attributes.get(key).and_then(AttrValue::as_int)
    }

    /// Heading level, if this is a heading
    pub fn heading_level(&self) -> Option<u8> {
        if self.node_type != NodeType::Heading {
            return None;
        }
        Some(self.attr_int("level").unwrap_or(1).clamp(1, 6) as u8)
    }

    /// Number of grapheme clusters in this node's text
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Check whether a mark of the given type is applied to this run
    pub fn has_mark(&self, mark_type: crate::MarkType) -> bool {
        Mark::set_contains(&self.marks, mark_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkType;

    #[test]
    fn test_atomic_nodes_reject_children() {
        let mut note = Node::new(NodeType::Note);
        let child = NodeId::new();
        assert!(note.push_child(child).is_err());
        assert!(note.children().is_empty());
    }

    #[test]
    fn test_text_nodes_reject_children() {
        let mut text = Node::text("asana");
        assert!(text.push_child(NodeId::new()).is_err());
    }

    #[test]
    fn test_heading_level_clamped() {
        let h = Node::heading(9);
        assert_eq!(h.heading_level(), Some(6));
        let h = Node::heading(0);
        assert_eq!(h.heading_level(), Some(1));
    }

    #[test]
    fn test_text_with_marks() {
        let t = Node::text_with_marks("dharma", vec![Mark::new(MarkType::Bold)]);
        assert!(t.has_mark(MarkType::Bold));
        assert!(!t.has_mark(MarkType::Link));
        assert_eq!(t.grapheme_count(), 6);
    }
}
