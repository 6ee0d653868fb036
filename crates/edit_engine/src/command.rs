//! Commands - atomically applied operation sequences

use crate::{apply_operation, Operation, Result};
use doc_model::{ChangeSummary, DocumentTree};

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The new document tree after the command
    pub tree: DocumentTree,
    /// What the command changed
    pub summary: ChangeSummary,
}

/// A named sequence of operations applied atomically.
///
/// The command applies against a clone of the input tree; if any operation
/// fails, the clone is discarded and the original tree is untouched.
#[derive(Debug)]
pub struct Command {
    name: &'static str,
    operations: Vec<Operation>,
}

impl Command {
    /// Create a command from a sequence of operations
    pub fn new(name: &'static str, operations: Vec<Operation>) -> Self {
        Self { name, operations }
    }

    /// Create a command from a single operation
    pub fn single(name: &'static str, operation: Operation) -> Self {
        Self::new(name, vec![operation])
    }

    /// Get the display name of this command
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the operations in application order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Apply this command to a document, producing a new version
    pub fn apply(&self, tree: &DocumentTree) -> Result<CommandResult> {
        let mut next = tree.clone();
        let mut summary = ChangeSummary::default();

        for operation in &self.operations {
            apply_operation(&mut next, operation, &mut summary)?;
        }

        next.validate()?;
        next.document.increment_version();

        Ok(CommandResult {
            tree: next,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Node, NodeId, Position};

    fn tree_with_text(text: &str) -> (DocumentTree, NodeId) {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text(text), para_id, None).unwrap();
        (tree, para_id)
    }

    #[test]
    fn test_command_produces_new_version() {
        let (tree, para_id) = tree_with_text("abc");
        let before = tree.document.version();

        let command = Command::single(
            "Insert Text",
            Operation::InsertText {
                position: Position::new(para_id, 3),
                text: "def".to_string(),
            },
        );
        let result = command.apply(&tree).unwrap();

        assert_eq!(result.tree.document.version(), before + 1);
        // The input tree is an unchanged snapshot
        assert_eq!(tree.block_text(para_id), "abc");
        assert_eq!(result.tree.block_text(para_id), "abcdef");
    }

    #[test]
    fn test_failing_step_applies_nothing() {
        let (tree, para_id) = tree_with_text("abc");

        let command = Command::new(
            "Insert Twice",
            vec![
                Operation::InsertText {
                    position: Position::new(para_id, 0),
                    text: "x".to_string(),
                },
                Operation::InsertText {
                    position: Position::new(para_id, 99),
                    text: "y".to_string(),
                },
            ],
        );

        assert!(command.apply(&tree).is_err());
        // First step must not leak through
        assert_eq!(tree.block_text(para_id), "abc");
        assert_eq!(tree.document.version(), 0);
    }
}
