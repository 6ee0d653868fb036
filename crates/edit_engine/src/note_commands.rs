//! Note commands and ordinal derivation

use crate::{Command, EditError, Operation, Result};
use doc_model::elements::{format_ordinal, note, note_kind, NoteKind, ATTR_CONTENT};
use doc_model::{attrs, AttrValue, DocumentTree, NodeId, NodeType, Position};

/// Build a command inserting a note at a position
pub fn insert_note(position: Position, kind: NoteKind, content: impl Into<String>) -> Command {
    Command::single(
        "Insert Note",
        Operation::InsertInline {
            position,
            node: note(kind, content),
        },
    )
}

/// Build a command replacing a note's body text
pub fn set_note_content(
    tree: &DocumentTree,
    note_id: NodeId,
    content: impl Into<String>,
) -> Result<Command> {
    let node = tree
        .get(note_id)
        .ok_or(doc_model::DocModelError::NodeNotFound(note_id.as_uuid()))?;
    if node.node_type != NodeType::Note {
        return Err(EditError::InvalidCommand(format!(
            "{} is not a note",
            node.node_type.name()
        )));
    }
    Ok(Command::single(
        "Set Note Content",
        Operation::SetAttributes {
            node_id: note_id,
            set: attrs([(ATTR_CONTENT, AttrValue::Str(content.into()))]),
            unset: Vec::new(),
        },
    ))
}

/// Display ordinal of a note: one plus the number of notes of the same kind
/// that precede it in document order.
///
/// Recomputed on every query; nothing is cached, so the result is correct
/// after arbitrary insertions, deletions, and reorderings.
pub fn note_ordinal(tree: &DocumentTree, note_id: NodeId) -> Option<u32> {
    let target_kind = note_kind(tree.get(note_id)?)?;
    let mut ordinal = 0;
    for id in tree.walk() {
        let Some(node) = tree.get(id) else { continue };
        if node.node_type != NodeType::Note {
            continue;
        }
        if note_kind(node) == Some(target_kind) {
            ordinal += 1;
        }
        if id == note_id {
            return Some(ordinal);
        }
    }
    None
}

/// Formatted display label for a note (arabic for footnotes, the symbol
/// cycle for special notes)
pub fn note_label(tree: &DocumentTree, note_id: NodeId) -> Option<String> {
    let kind = note_kind(tree.get(note_id)?)?;
    let ordinal = note_ordinal(tree, note_id)?;
    Some(format_ordinal(kind, ordinal))
}
