//! Atomic operations over the document tree

use crate::Result;
use doc_model::{
    Attributes, ChangeSummary, DocumentTree, Mark, MarkType, Node, NodeId, Position, TextEdit,
};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// One piece of inline replacement content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InlinePiece {
    /// A text run with marks
    Text { text: String, marks: Vec<Mark> },
    /// An atomic inline node
    Node(Node),
}

impl InlinePiece {
    fn grapheme_count(&self) -> usize {
        match self {
            InlinePiece::Text { text, .. } => text.graphemes(true).count(),
            InlinePiece::Node(_) => 0,
        }
    }
}

/// Structured replacement content for `ReplaceRange`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Replacement {
    /// Inline content spliced into the containing block at the range start
    Inline(Vec<InlinePiece>),
    /// A block inserted after the containing block; the range text is removed
    Block {
        node: Node,
        children: Vec<InlinePiece>,
    },
}

/// An atomic edit operation
///
/// All operations are total over well-formed positions; an out-of-range
/// position fails the operation (and with it the whole command) without
/// touching the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Insert text at a position
    InsertText { position: Position, text: String },
    /// Insert an inline node at a position
    InsertInline { position: Position, node: Node },
    /// Insert a block at a top-level index (append when None)
    InsertBlock {
        node: Node,
        children: Vec<InlinePiece>,
        index: Option<usize>,
    },
    /// Delete the text between two positions in the same block
    DeleteRange { start: Position, end: Position },
    /// Remove a node and its subtree
    RemoveNode { node_id: NodeId },
    /// Merge attributes into a node, removing the listed keys
    SetAttributes {
        node_id: NodeId,
        set: Attributes,
        unset: Vec<String>,
    },
    /// Apply a mark over a range in the same block
    AddMark {
        start: Position,
        end: Position,
        mark: Mark,
    },
    /// Remove all marks of a type over a range in the same block
    RemoveMark {
        start: Position,
        end: Position,
        mark_type: MarkType,
    },
    /// Replace a range with structured content
    ReplaceRange {
        start: Position,
        end: Position,
        content: Replacement,
    },
}

/// Resolve a start/end pair onto one block, rejecting cross-block ranges
fn resolve_range(
    tree: &DocumentTree,
    start: &Position,
    end: &Position,
) -> Result<(NodeId, usize, usize)> {
    let (start_block, start_offset) = tree.resolve_block_offset(start)?;
    let (end_block, end_offset) = tree.resolve_block_offset(end)?;
    if start_block != end_block {
        return Err(crate::EditError::InvalidCommand(
            "range spans multiple blocks".to_string(),
        ));
    }
    if start_offset > end_offset {
        return Err(crate::EditError::InvalidCommand(
            "range start after range end".to_string(),
        ));
    }
    Ok((start_block, start_offset, end_offset))
}

fn splice_inline(
    tree: &mut DocumentTree,
    block: NodeId,
    offset: usize,
    pieces: &[InlinePiece],
    summary: &mut ChangeSummary,
) -> Result<()> {
    let mut at = offset;
    for piece in pieces {
        match piece {
            InlinePiece::Text { text, marks } => {
                let run = Node::text_with_marks(text.clone(), marks.clone());
                tree.insert_inline_at(block, at, run)?;
                summary.record_edit(TextEdit {
                    block,
                    offset: at,
                    removed: 0,
                    inserted: piece.grapheme_count(),
                });
                at += piece.grapheme_count();
            }
            InlinePiece::Node(node) => {
                tree.insert_inline_at(block, at, node.clone())?;
                summary.structure_changed = true;
            }
        }
    }
    Ok(())
}

/// Apply one operation to the tree, recording its effect in the summary
pub fn apply_operation(
    tree: &mut DocumentTree,
    operation: &Operation,
    summary: &mut ChangeSummary,
) -> Result<()> {
    match operation {
        Operation::InsertText { position, text } => {
            let (block, offset) = tree.resolve_block_offset(position)?;
            tree.insert_text_in_block(block, offset, text)?;
            summary.record_edit(TextEdit {
                block,
                offset,
                removed: 0,
                inserted: text.graphemes(true).count(),
            });
        }
        Operation::InsertInline { position, node } => {
            let (block, offset) = tree.resolve_block_offset(position)?;
            tree.insert_inline_at(block, offset, node.clone())?;
            summary.structure_changed = true;
        }
        Operation::InsertBlock {
            node,
            children,
            index,
        } => {
            let block_id = node.id();
            tree.insert_node(node.clone(), tree.root_id(), *index)?;
            summary.structure_changed = true;
            splice_inline(tree, block_id, 0, children, summary)?;
        }
        Operation::DeleteRange { start, end } => {
            let (block, start_offset, end_offset) = resolve_range(tree, start, end)?;
            tree.delete_range_in_block(block, start_offset, end_offset)?;
            summary.record_edit(TextEdit {
                block,
                offset: start_offset,
                removed: end_offset - start_offset,
                inserted: 0,
            });
        }
        Operation::RemoveNode { node_id } => {
            let had_text = !tree.block_text(*node_id).is_empty();
            tree.remove_node(*node_id)?;
            summary.structure_changed = true;
            if had_text {
                summary.text_changed = true;
            }
        }
        Operation::SetAttributes {
            node_id,
            set,
            unset,
        } => {
            let node = tree
                .get_mut(*node_id)
                .ok_or(doc_model::DocModelError::NodeNotFound(node_id.as_uuid()))?;
            for (key, value) in set {
                node.attributes.insert(key.clone(), value.clone());
            }
            for key in unset {
                node.attributes.remove(key);
            }
        }
        Operation::AddMark { start, end, mark } => {
            let (block, start_offset, end_offset) = resolve_range(tree, start, end)?;
            tree.add_mark_in_block(block, start_offset, end_offset, mark.clone())?;
            summary.structure_changed = true;
        }
        Operation::RemoveMark {
            start,
            end,
            mark_type,
        } => {
            let (block, start_offset, end_offset) = resolve_range(tree, start, end)?;
            tree.remove_mark_in_block(block, start_offset, end_offset, *mark_type)?;
            summary.structure_changed = true;
        }
        Operation::ReplaceRange {
            start,
            end,
            content,
        } => {
            let (block, start_offset, end_offset) = resolve_range(tree, start, end)?;
            tree.delete_range_in_block(block, start_offset, end_offset)?;
            summary.record_edit(TextEdit {
                block,
                offset: start_offset,
                removed: end_offset - start_offset,
                inserted: 0,
            });
            match content {
                Replacement::Inline(pieces) => {
                    splice_inline(tree, block, start_offset, pieces, summary)?;
                }
                Replacement::Block { node, children } => {
                    let body_index = tree
                        .document
                        .children()
                        .iter()
                        .position(|&b| b == block)
                        .map(|i| i + 1);
                    let block_id = node.id();
                    tree.insert_node(node.clone(), tree.root_id(), body_index)?;
                    summary.structure_changed = true;
                    splice_inline(tree, block_id, 0, children, summary)?;
                }
            }
        }
    }
    Ok(())
}
