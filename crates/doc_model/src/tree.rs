//! Document tree storage and traversal

use crate::{
    DocModelError, Document, Mark, Node, NodeId, NodeType, Position, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Convert a grapheme offset into a byte offset within `text`
pub fn grapheme_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (byte_idx, _) in text.grapheme_indices(true) {
        if count == offset {
            return Some(byte_idx);
        }
        count += 1;
    }
    if count == offset {
        Some(text.len())
    } else {
        None
    }
}

/// Convert a byte offset into a grapheme offset within `text`
pub fn byte_to_grapheme(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].graphemes(true).count()
}

/// A text run within a block, with its block-relative grapheme offset
#[derive(Debug, Clone)]
pub struct TextRunRef {
    /// The text node
    pub node_id: NodeId,
    /// Grapheme offset of this run within the block's text
    pub start: usize,
    /// The run's text content
    pub text: String,
    /// Marks active on this run
    pub marks: Vec<Mark>,
}

/// The complete document tree structure
///
/// Nodes are stored in a single arena keyed by ID; ordering lives in each
/// parent's child list. Cloning the tree yields an independent snapshot,
/// which is how the mutation pipeline produces new immutable versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// The root document
    pub document: Document,
    /// Storage for all nodes
    nodes: HashMap<NodeId, Node>,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            nodes: HashMap::new(),
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.nodes.insert(para_id, para);
        tree.document.add_body_child(para_id);
        tree
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.document.id()
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Check if a node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of stored nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node under a parent at an optional index (append when None).
    ///
    /// The parent is either another stored node or the document root.
    pub fn insert_node(
        &mut self,
        mut node: Node,
        parent: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        let node_id = node.id();

        if parent == self.document.id() {
            node.set_parent(None);
            self.nodes.insert(node_id, node);
            match index {
                Some(i) if i <= self.document.children().len() => {
                    self.document.insert_body_child(i, node_id)
                }
                Some(i) => {
                    self.nodes.remove(&node_id);
                    return Err(DocModelError::InvalidPosition {
                        node_id: parent.as_uuid(),
                        offset: i,
                    });
                }
                None => self.document.add_body_child(node_id),
            }
            return Ok(node_id);
        }

        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(DocModelError::NodeNotFound(parent.as_uuid()))?;

        node.set_parent(Some(parent));
        match index {
            Some(i) => parent_node.insert_child(i, node_id)?,
            None => parent_node.push_child(node_id)?,
        }
        self.nodes.insert(node_id, node);
        Ok(node_id)
    }

    /// Remove a node and its entire subtree, detaching it from its parent
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .get(&id)
            .ok_or(DocModelError::NodeNotFound(id.as_uuid()))?;

        // Detach from parent (or the document body for top-level blocks)
        match node.parent() {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.remove_child(id);
                }
            }
            None => {
                self.document.remove_body_child(id);
            }
        }

        // Remove descendants
        let descendants: Vec<NodeId> = self.descendants_of(id);
        for child_id in descendants {
            self.nodes.remove(&child_id);
        }

        self.nodes
            .remove(&id)
            .ok_or(DocModelError::NodeNotFound(id.as_uuid()))
    }

    fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(id)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.get(next) {
                stack.extend_from_slice(node.children());
            }
            out.push(next);
        }
        out
    }

    /// The block node containing `id` (itself, when `id` is a top-level block)
    pub fn block_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.parent() {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// All nodes in document order (depth-first over the body)
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &block_id in self.document.children() {
            self.walk_into(block_id, &mut out);
        }
        out
    }

    fn walk_into(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if let Some(node) = self.get(id) {
            for &child in node.children() {
                self.walk_into(child, out);
            }
        }
    }

    /// Concatenated text of the block's text runs, in order
    pub fn block_text(&self, block_id: NodeId) -> String {
        let mut text = String::new();
        if let Some(block) = self.get(block_id) {
            for &child in block.children() {
                if let Some(node) = self.get(child) {
                    if node.node_type == NodeType::Text {
                        text.push_str(&node.text);
                    }
                }
            }
        }
        text
    }

    /// Plain text of the whole document, blocks joined with newlines
    pub fn plain_text(&self) -> String {
        self.document
            .children()
            .iter()
            .map(|&b| self.block_text(b))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text runs of a block with their block-relative grapheme offsets
    pub fn text_runs(&self, block_id: NodeId) -> Vec<TextRunRef> {
        let mut runs = Vec::new();
        let mut offset = 0;
        if let Some(block) = self.get(block_id) {
            for &child in block.children() {
                if let Some(node) = self.get(child) {
                    if node.node_type == NodeType::Text {
                        let len = node.grapheme_count();
                        runs.push(TextRunRef {
                            node_id: child,
                            start: offset,
                            text: node.text.clone(),
                            marks: node.marks.clone(),
                        });
                        offset += len;
                    }
                }
            }
        }
        runs
    }

    /// Total grapheme length of a block's text
    pub fn block_len(&self, block_id: NodeId) -> usize {
        self.get(block_id)
            .map(|block| {
                block
                    .children()
                    .iter()
                    .filter_map(|&c| self.get(c))
                    .filter(|n| n.node_type == NodeType::Text)
                    .map(|n| n.grapheme_count())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Resolve a position onto its containing block, validating the offset.
    ///
    /// Accepts positions addressed to a block (block-relative offset) or to a
    /// text node (run-relative offset, translated to block-relative).
    pub fn resolve_block_offset(&self, position: &Position) -> Result<(NodeId, usize)> {
        let node = self
            .get(position.node_id)
            .ok_or(DocModelError::NodeNotFound(position.node_id.as_uuid()))?;

        if node.node_type == NodeType::Text {
            let block_id = self.block_of(position.node_id).ok_or_else(|| {
                DocModelError::InvalidStructure("text node without a block".to_string())
            })?;
            if position.offset > node.grapheme_count() {
                return Err(DocModelError::InvalidPosition {
                    node_id: position.node_id.as_uuid(),
                    offset: position.offset,
                });
            }
            let run_start = self
                .text_runs(block_id)
                .into_iter()
                .find(|r| r.node_id == position.node_id)
                .map(|r| r.start)
                .unwrap_or(0);
            return Ok((block_id, run_start + position.offset));
        }

        if position.offset > self.block_len(position.node_id) {
            return Err(DocModelError::InvalidPosition {
                node_id: position.node_id.as_uuid(),
                offset: position.offset,
            });
        }
        Ok((position.node_id, position.offset))
    }

    /// Insert text at a block-relative offset, extending an adjacent run or
    /// creating a fresh one in an empty block
    pub fn insert_text_in_block(
        &mut self,
        block_id: NodeId,
        offset: usize,
        text: &str,
    ) -> Result<()> {
        let runs = self.text_runs(block_id);

        for run in &runs {
            let len = run.text.graphemes(true).count();
            if offset < run.start || offset > run.start + len {
                continue;
            }
            // Typing at the trailing edge of a non-inclusive mark must not
            // extend it; fall through to the following run (or a fresh one).
            if offset == run.start + len
                && run.marks.iter().any(|m| !m.mark_type.is_inclusive())
            {
                continue;
            }
            let in_run = offset - run.start;
            let byte =
                grapheme_to_byte(&run.text, in_run).ok_or(DocModelError::InvalidPosition {
                    node_id: run.node_id.as_uuid(),
                    offset: in_run,
                })?;
            let node = self
                .get_mut(run.node_id)
                .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
            node.text.insert_str(byte, text);
            return Ok(());
        }

        // Empty block, or an insertion point only reachable past a
        // non-inclusive tail run: append a fresh unmarked run.
        if offset == self.block_len(block_id) {
            let run = Node::text(text);
            self.insert_node(run, block_id, None)?;
            return Ok(());
        }

        Err(DocModelError::InvalidPosition {
            node_id: block_id.as_uuid(),
            offset,
        })
    }

    /// Delete a block-relative grapheme range, dropping runs that become empty
    pub fn delete_range_in_block(
        &mut self,
        block_id: NodeId,
        start: usize,
        end: usize,
    ) -> Result<String> {
        if start > end || end > self.block_len(block_id) {
            return Err(DocModelError::InvalidPosition {
                node_id: block_id.as_uuid(),
                offset: end,
            });
        }

        let runs = self.text_runs(block_id);
        let mut removed = String::new();
        let mut empty_runs = Vec::new();

        for run in runs {
            let len = run.text.graphemes(true).count();
            let run_end = run.start + len;
            if run_end <= start || run.start >= end {
                continue;
            }
            let cut_start = start.max(run.start) - run.start;
            let cut_end = end.min(run_end) - run.start;
            let byte_start = grapheme_to_byte(&run.text, cut_start).unwrap_or(run.text.len());
            let byte_end = grapheme_to_byte(&run.text, cut_end).unwrap_or(run.text.len());

            removed.push_str(&run.text[byte_start..byte_end]);
            let node = self
                .get_mut(run.node_id)
                .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
            node.text.replace_range(byte_start..byte_end, "");
            if node.text.is_empty() {
                empty_runs.push(run.node_id);
            }
        }

        for run_id in empty_runs {
            let _ = self.remove_node(run_id);
        }

        Ok(removed)
    }

    /// Split the run containing the block-relative offset in two. Splitting
    /// at a run boundary is a no-op.
    pub fn split_run_at(&mut self, block_id: NodeId, offset: usize) -> Result<()> {
        let runs = self.text_runs(block_id);
        for run in runs.iter() {
            let len = run.text.graphemes(true).count();
            if offset > run.start && offset < run.start + len {
                let in_run = offset - run.start;
                let byte = grapheme_to_byte(&run.text, in_run).ok_or(
                    DocModelError::InvalidPosition {
                        node_id: run.node_id.as_uuid(),
                        offset: in_run,
                    },
                )?;
                let tail_text = run.text[byte..].to_string();
                let marks = run.marks.clone();

                let node = self
                    .get_mut(run.node_id)
                    .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
                node.text.truncate(byte);

                // Child index of the run inside the block, not the run index:
                // inline atoms may sit between runs.
                let child_index = self
                    .get(block_id)
                    .and_then(|b| b.children().iter().position(|&c| c == run.node_id))
                    .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
                let tail = Node::text_with_marks(tail_text, marks);
                self.insert_node(tail, block_id, Some(child_index + 1))?;
                return Ok(());
            }
        }
        Ok(())
    }

    /// Apply a mark over a block-relative grapheme range, splitting runs at
    /// the range boundaries
    pub fn add_mark_in_block(
        &mut self,
        block_id: NodeId,
        start: usize,
        end: usize,
        mark: Mark,
    ) -> Result<()> {
        if start >= end || end > self.block_len(block_id) {
            return Err(DocModelError::InvalidPosition {
                node_id: block_id.as_uuid(),
                offset: end,
            });
        }
        self.split_run_at(block_id, start)?;
        self.split_run_at(block_id, end)?;

        let runs = self.text_runs(block_id);
        for run in runs {
            let len = run.text.graphemes(true).count();
            if run.start >= start && run.start + len <= end {
                let node = self
                    .get_mut(run.node_id)
                    .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
                if !node.marks.iter().any(|m| m.mark_type == mark.mark_type) {
                    node.marks.push(mark.clone());
                }
            }
        }
        Ok(())
    }

    /// Remove all marks of a type over a block-relative grapheme range
    pub fn remove_mark_in_block(
        &mut self,
        block_id: NodeId,
        start: usize,
        end: usize,
        mark_type: crate::MarkType,
    ) -> Result<()> {
        if start >= end || end > self.block_len(block_id) {
            return Err(DocModelError::InvalidPosition {
                node_id: block_id.as_uuid(),
                offset: end,
            });
        }
        self.split_run_at(block_id, start)?;
        self.split_run_at(block_id, end)?;

        let runs = self.text_runs(block_id);
        for run in runs {
            let len = run.text.graphemes(true).count();
            if run.start >= start && run.start + len <= end {
                let node = self
                    .get_mut(run.node_id)
                    .ok_or(DocModelError::NodeNotFound(run.node_id.as_uuid()))?;
                node.marks.retain(|m| m.mark_type != mark_type);
            }
        }
        Ok(())
    }

    /// Child insertion index for a block-relative offset. Assumes runs have
    /// already been split at the offset, so it falls on a child boundary.
    pub fn child_index_at(&self, block_id: NodeId, offset: usize) -> Result<usize> {
        let block = self
            .get(block_id)
            .ok_or(DocModelError::NodeNotFound(block_id.as_uuid()))?;
        let mut accumulated = 0;
        for (index, &child) in block.children().iter().enumerate() {
            if accumulated >= offset {
                return Ok(index);
            }
            if let Some(node) = self.get(child) {
                if node.node_type == NodeType::Text {
                    accumulated += node.grapheme_count();
                }
            }
        }
        if accumulated >= offset {
            Ok(block.children().len())
        } else {
            Err(DocModelError::InvalidPosition {
                node_id: block_id.as_uuid(),
                offset,
            })
        }
    }

    /// Insert an inline node at a block-relative offset, splitting the
    /// containing run when the offset falls inside one
    pub fn insert_inline_at(
        &mut self,
        block_id: NodeId,
        offset: usize,
        node: Node,
    ) -> Result<NodeId> {
        self.split_run_at(block_id, offset)?;
        let index = self.child_index_at(block_id, offset)?;
        self.insert_node(node, block_id, Some(index))
    }

    /// Validate structural invariants: atomic nodes carry no children, text
    /// nodes carry no children, child links resolve, parents match
    pub fn validate(&self) -> Result<()> {
        for (id, node) in &self.nodes {
            if !node.can_have_children() && !node.children().is_empty() {
                return Err(DocModelError::InvalidStructure(format!(
                    "{} node {} has children",
                    node.node_type.name(),
                    id
                )));
            }
            for &child in node.children() {
                let child_node = self
                    .get(child)
                    .ok_or(DocModelError::NodeNotFound(child.as_uuid()))?;
                if child_node.parent() != Some(*id) {
                    return Err(DocModelError::InvalidStructure(format!(
                        "child {} does not point back to parent {}",
                        child, id
                    )));
                }
            }
        }
        for &block in self.document.children() {
            if !self.contains(block) {
                return Err(DocModelError::NodeNotFound(block.as_uuid()));
            }
        }
        Ok(())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkType;

    fn tree_with_text(text: &str) -> (DocumentTree, NodeId) {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text(text), para_id, None).unwrap();
        (tree, para_id)
    }

    #[test]
    fn test_insert_and_block_text() {
        let (tree, para_id) = tree_with_text("sthira sukham asanam");
        assert_eq!(tree.block_text(para_id), "sthira sukham asanam");
        assert_eq!(tree.block_len(para_id), 20);
    }

    #[test]
    fn test_insert_text_in_block() {
        let (mut tree, para_id) = tree_with_text("sthira asanam");
        tree.insert_text_in_block(para_id, 7, "sukham ").unwrap();
        assert_eq!(tree.block_text(para_id), "sthira sukham asanam");
    }

    #[test]
    fn test_delete_range_in_block() {
        let (mut tree, para_id) = tree_with_text("sthira sukham asanam");
        let removed = tree.delete_range_in_block(para_id, 7, 14).unwrap();
        assert_eq!(removed, "sukham ");
        assert_eq!(tree.block_text(para_id), "sthira asanam");
    }

    #[test]
    fn test_delete_out_of_range_rejected() {
        let (mut tree, para_id) = tree_with_text("yoga");
        assert!(tree.delete_range_in_block(para_id, 2, 99).is_err());
        assert_eq!(tree.block_text(para_id), "yoga");
    }

    #[test]
    fn test_add_mark_splits_runs() {
        let (mut tree, para_id) = tree_with_text("sthira sukham asanam");
        tree.add_mark_in_block(para_id, 7, 13, Mark::new(MarkType::Bold))
            .unwrap();

        let runs = tree.text_runs(para_id);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].text, "sukham");
        assert!(Mark::set_contains(&runs[1].marks, MarkType::Bold));
        assert!(!Mark::set_contains(&runs[0].marks, MarkType::Bold));
        // Text content unchanged by the mark change
        assert_eq!(tree.block_text(para_id), "sthira sukham asanam");
    }

    #[test]
    fn test_remove_mark() {
        let (mut tree, para_id) = tree_with_text("sthira sukham");
        tree.add_mark_in_block(para_id, 0, 6, Mark::new(MarkType::Italic))
            .unwrap();
        tree.remove_mark_in_block(para_id, 0, 6, MarkType::Italic)
            .unwrap();
        assert!(tree
            .text_runs(para_id)
            .iter()
            .all(|r| !Mark::set_contains(&r.marks, MarkType::Italic)));
    }

    #[test]
    fn test_typing_at_non_inclusive_boundary_does_not_extend_mark() {
        let (mut tree, para_id) = tree_with_text("chapter one");
        tree.add_mark_in_block(para_id, 0, 7, Mark::new(MarkType::TocAnchor))
            .unwrap();
        tree.insert_text_in_block(para_id, 7, "X").unwrap();

        let anchored: String = tree
            .text_runs(para_id)
            .iter()
            .filter(|r| Mark::set_contains(&r.marks, MarkType::TocAnchor))
            .map(|r| r.text.clone())
            .collect();
        assert_eq!(anchored, "chapter");
        assert_eq!(tree.block_text(para_id), "chapterX one");
    }

    #[test]
    fn test_remove_node_detaches_subtree() {
        let (mut tree, para_id) = tree_with_text("gone");
        tree.remove_node(para_id).unwrap();
        assert!(tree.is_empty());
        assert!(tree.document.children().is_empty());
    }

    #[test]
    fn test_walk_document_order() {
        let mut tree = DocumentTree::new();
        let h = Node::heading(1);
        let h_id = h.id();
        tree.insert_node(h, tree.root_id(), None).unwrap();
        let p = Node::paragraph();
        let p_id = p.id();
        tree.insert_node(p, tree.root_id(), None).unwrap();
        let t_id = tree.insert_node(Node::text("body"), p_id, None).unwrap();

        assert_eq!(tree.walk(), vec![h_id, p_id, t_id]);
    }

    #[test]
    fn test_validate_clean_tree() {
        let (tree, _) = tree_with_text("ok");
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_resolve_block_offset_for_text_node() {
        let (tree, para_id) = tree_with_text("abc");
        let run_id = tree.text_runs(para_id)[0].node_id;
        let (block, offset) = tree
            .resolve_block_offset(&Position::new(run_id, 2))
            .unwrap();
        assert_eq!(block, para_id);
        assert_eq!(offset, 2);
        assert!(tree
            .resolve_block_offset(&Position::new(run_id, 10))
            .is_err());
    }
}
