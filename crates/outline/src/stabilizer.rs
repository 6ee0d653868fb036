//! Heading-id stabilization pass

use crate::slugify;
use doc_model::{attrs, AttrValue, ChangeSummary, DocumentTree, NodeId, NodeType};
use edit_engine::{Command, EditorEngine, Operation, Result};
use std::collections::HashSet;
use tracing::debug;

/// Attribute key carrying a heading's stable id
pub const ATTR_HEADING_ID: &str = "headingId";

/// Compute the target id for every heading, in document order.
///
/// Ids derive from the slugified heading text, `heading-<position>` for
/// empty text. A collision takes the `-<n>` suffix with the smallest unused
/// `n >= 1`. The computation is a pure function of the document, which is
/// what makes the pass idempotent.
pub fn compute_heading_ids(tree: &DocumentTree) -> Vec<(NodeId, String)> {
    let mut used: HashSet<String> = HashSet::new();
    let mut assigned = Vec::new();

    for (position, &block) in tree.document.children().iter().enumerate() {
        let Some(node) = tree.get(block) else { continue };
        if node.node_type != NodeType::Heading {
            continue;
        }

        let candidate = {
            let slug = slugify(&tree.block_text(block));
            if slug.is_empty() {
                format!("heading-{position}")
            } else {
                slug
            }
        };

        let mut unique = candidate.clone();
        let mut n = 1;
        while used.contains(&unique) {
            unique = format!("{candidate}-{n}");
            n += 1;
        }
        used.insert(unique.clone());
        assigned.push((block, unique));
    }

    assigned
}

/// Build the command updating only the headings whose current id differs
/// from the freshly computed one. Returns None when every id is already
/// correct, so running the pass twice is a no-op.
pub fn stabilize_headings(tree: &DocumentTree) -> Option<Command> {
    let mut operations = Vec::new();

    for (block, id) in compute_heading_ids(tree) {
        let current = tree.get(block).and_then(|n| n.attr_str(ATTR_HEADING_ID));
        if current == Some(id.as_str()) {
            continue;
        }
        operations.push(Operation::SetAttributes {
            node_id: block,
            set: attrs([(ATTR_HEADING_ID, AttrValue::Str(id))]),
            unset: Vec::new(),
        });
    }

    if operations.is_empty() {
        None
    } else {
        Some(Command::new("Stabilize Heading Ids", operations))
    }
}

/// Run the stabilizer after a committed change, but only when the change
/// altered text. Pure mark or attribute churn elsewhere must not re-run
/// the pass; needless id reassignment would break external anchors.
///
/// Returns whether a stabilization command was executed.
pub fn maybe_stabilize(engine: &mut EditorEngine, summary: &ChangeSummary) -> Result<bool> {
    if !summary.text_changed {
        return Ok(false);
    }
    match stabilize_headings(engine.tree()) {
        Some(command) => {
            let changed = command.operations().len();
            engine.execute(command)?;
            debug!(changed, "heading ids stabilized");
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Node, Position};
    use proptest::prelude::*;

    fn heading(tree: &mut DocumentTree, text: &str) -> NodeId {
        let h = Node::heading(2);
        let h_id = h.id();
        tree.insert_node(h, tree.root_id(), None).unwrap();
        if !text.is_empty() {
            tree.insert_node(Node::text(text), h_id, None).unwrap();
        }
        h_id
    }

    fn heading_id(tree: &DocumentTree, block: NodeId) -> Option<String> {
        tree.get(block)
            .and_then(|n| n.attr_str(ATTR_HEADING_ID))
            .map(str::to_string)
    }

    #[test]
    fn test_collisions_take_numbered_suffixes_in_order() {
        let mut tree = DocumentTree::new();
        let h1 = heading(&mut tree, "Intro");
        let h2 = heading(&mut tree, "Intro");
        let h3 = heading(&mut tree, "Intro");
        let mut engine = EditorEngine::with_tree(tree);

        let command = stabilize_headings(engine.tree()).unwrap();
        engine.execute(command).unwrap();

        assert_eq!(heading_id(engine.tree(), h1).as_deref(), Some("intro"));
        assert_eq!(heading_id(engine.tree(), h2).as_deref(), Some("intro-1"));
        assert_eq!(heading_id(engine.tree(), h3).as_deref(), Some("intro-2"));
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let mut tree = DocumentTree::new();
        heading(&mut tree, "One");
        heading(&mut tree, "Two");
        let mut engine = EditorEngine::with_tree(tree);

        let first = stabilize_headings(engine.tree()).unwrap();
        engine.execute(first).unwrap();
        assert!(stabilize_headings(engine.tree()).is_none());
    }

    #[test]
    fn test_empty_heading_falls_back_to_position() {
        let mut tree = DocumentTree::new();
        let h = heading(&mut tree, "");
        let mut engine = EditorEngine::with_tree(tree);
        engine
            .execute(stabilize_headings(engine.tree()).unwrap())
            .unwrap();
        assert_eq!(heading_id(engine.tree(), h).as_deref(), Some("heading-0"));
    }

    #[test]
    fn test_only_changed_headings_are_touched() {
        let mut tree = DocumentTree::new();
        heading(&mut tree, "Stable");
        let h2 = heading(&mut tree, "Renamed");
        let mut engine = EditorEngine::with_tree(tree);
        engine
            .execute(stabilize_headings(engine.tree()).unwrap())
            .unwrap();

        // Retitle the second heading only
        engine
            .execute(Command::new(
                "Edit Heading",
                vec![
                    Operation::DeleteRange {
                        start: Position::new(h2, 0),
                        end: Position::new(h2, 7),
                    },
                    Operation::InsertText {
                        position: Position::new(h2, 0),
                        text: "Fresh Title".to_string(),
                    },
                ],
            ))
            .unwrap();

        let command = stabilize_headings(engine.tree()).unwrap();
        assert_eq!(command.operations().len(), 1);
    }

    #[test]
    fn test_gate_skips_non_text_changes() {
        let mut tree = DocumentTree::new();
        heading(&mut tree, "Intro");
        let mut engine = EditorEngine::with_tree(tree);

        let summary = ChangeSummary {
            text_changed: false,
            structure_changed: true,
            edits: Vec::new(),
        };
        assert!(!maybe_stabilize(&mut engine, &summary).unwrap());
        // Nothing ran: the heading still has no id
        let first = engine.tree().document.children()[0];
        assert!(heading_id(engine.tree(), first).is_none());

        let summary = ChangeSummary {
            text_changed: true,
            structure_changed: false,
            edits: Vec::new(),
        };
        assert!(maybe_stabilize(&mut engine, &summary).unwrap());
        assert_eq!(heading_id(engine.tree(), first).as_deref(), Some("intro"));
    }

    proptest! {
        #[test]
        fn prop_ids_unique_and_idempotent(titles in proptest::collection::vec("[A-Za-z ]{0,12}", 0..8)) {
            let mut tree = DocumentTree::new();
            for title in &titles {
                heading(&mut tree, title);
            }
            let mut engine = EditorEngine::with_tree(tree);

            if let Some(command) = stabilize_headings(engine.tree()) {
                engine.execute(command).unwrap();
            }

            let ids: Vec<String> = engine
                .tree()
                .document
                .children()
                .iter()
                .filter_map(|&b| heading_id(engine.tree(), b))
                .collect();

            // Every heading got an id, and no two collide
            prop_assert_eq!(ids.len(), titles.len());
            let unique: std::collections::HashSet<&String> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());

            // Running the pass again changes nothing
            prop_assert!(stabilize_headings(engine.tree()).is_none());
        }
    }
}
