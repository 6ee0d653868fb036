//! Generic element insertion through the registry
//!
//! Any registered node-shaped element type is constructible here without a
//! per-type command; types with toggle or compute semantics (notes, anchors,
//! alternate readings) have their own named commands on top.

use crate::{Command, EditError, Operation, Result};
use doc_model::{Attributes, DocumentTree, ElementRegistry, ElementShape, Position};

/// Build a command inserting a registered element at a position.
///
/// Inline elements insert at the position; block elements insert after the
/// block containing it.
pub fn insert_element(
    tree: &DocumentTree,
    registry: &ElementRegistry,
    type_name: &str,
    attributes: Attributes,
    position: Position,
) -> Result<Command> {
    let spec = registry
        .get(type_name)
        .ok_or_else(|| EditError::InvalidCommand(format!("unknown element type {type_name}")))?;

    match spec.shape {
        ElementShape::Mark => Err(EditError::InvalidCommand(format!(
            "{type_name} is a mark; apply it over a range instead"
        ))),
        ElementShape::AtomicInline => {
            let node = registry.construct_node(type_name, attributes)?;
            Ok(Command::single(
                "Insert Element",
                Operation::InsertInline { position, node },
            ))
        }
        ElementShape::AtomicBlock => {
            let (block, _) = tree.resolve_block_offset(&position)?;
            let index = tree
                .document
                .children()
                .iter()
                .position(|&b| b == block)
                .map(|i| i + 1);
            let node = registry.construct_node(type_name, attributes)?;
            Ok(Command::single(
                "Insert Element",
                Operation::InsertBlock {
                    node,
                    children: Vec::new(),
                    index,
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorEngine;
    use doc_model::elements::{note_kind, NoteKind};
    use doc_model::{attrs, AttrValue, Node, NodeId, NodeType};

    fn engine_with_text(text: &str) -> (EditorEngine, NodeId) {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text(text), para_id, None).unwrap();
        (EditorEngine::with_tree(tree), para_id)
    }

    #[test]
    fn test_generic_insert_of_registered_inline_type() {
        let registry = ElementRegistry::builtin();
        let (mut engine, para_id) = engine_with_text("body");

        let command = insert_element(
            engine.tree(),
            &registry,
            "note",
            attrs([("content", AttrValue::from("generic"))]),
            Position::new(para_id, 4),
        )
        .unwrap();
        engine.execute(command).unwrap();

        let note_id = engine
            .tree()
            .walk()
            .into_iter()
            .find(|&id| engine.tree().get(id).map(|n| n.node_type) == Some(NodeType::Note))
            .unwrap();
        // Defaults fill what the caller left out
        assert_eq!(
            note_kind(engine.tree().get(note_id).unwrap()),
            Some(NoteKind::Footnote)
        );
    }

    #[test]
    fn test_generic_insert_of_block_type_lands_after_block() {
        let registry = ElementRegistry::builtin();
        let (mut engine, para_id) = engine_with_text("before");

        let command = insert_element(
            engine.tree(),
            &registry,
            "citation",
            attrs([("refId", AttrValue::from("gita-4-7"))]),
            Position::new(para_id, 3),
        )
        .unwrap();
        engine.execute(command).unwrap();

        let blocks = engine.tree().document.children();
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            engine.tree().get(blocks[1]).unwrap().node_type,
            NodeType::Citation
        );
    }

    #[test]
    fn test_mark_types_rejected() {
        let registry = ElementRegistry::builtin();
        let (engine, para_id) = engine_with_text("x");
        assert!(insert_element(
            engine.tree(),
            &registry,
            "tocAnchor",
            Attributes::new(),
            Position::new(para_id, 0),
        )
        .is_err());
    }
}
