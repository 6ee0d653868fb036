//! Command execution engine

use crate::{Command, Result};
use doc_model::{ChangeSummary, DocumentTree, Selection};
use tracing::debug;

/// The main editing engine owning the current document state
///
/// The engine is the only producer of new document versions; derived layers
/// read the tree and its version counter but never mutate it.
pub struct EditorEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Current selection
    selection: Selection,
}

impl EditorEngine {
    /// Create a new engine with a single empty paragraph
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::with_empty_paragraph())
    }

    /// Create an engine over an existing document tree
    pub fn with_tree(tree: DocumentTree) -> Self {
        let selection = if let Some(&block) = tree.document.children().first() {
            Selection::at_start_of(block)
        } else {
            Selection::default()
        };
        Self { tree, selection }
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Get the current document version
    pub fn version(&self) -> u64 {
        self.tree.document.version()
    }

    /// Get the current selection
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Execute a command, committing a new document version.
    ///
    /// On failure the current version stays in place. On success the
    /// selection is mapped through the command's text edits.
    pub fn execute(&mut self, command: Command) -> Result<ChangeSummary> {
        let result = command.apply(&self.tree)?;
        debug!(
            command = command.name(),
            version = result.tree.document.version(),
            text_changed = result.summary.text_changed,
            "command committed"
        );

        self.selection = map_selection(&self.selection, &result.summary);
        self.tree = result.tree;
        Ok(result.summary)
    }
}

impl Default for EditorEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn map_selection(selection: &Selection, summary: &ChangeSummary) -> Selection {
    let mut mapped = *selection;
    mapped.anchor.offset = summary.map_offset(mapped.anchor.node_id, mapped.anchor.offset);
    mapped.focus.offset = summary.map_offset(mapped.focus.node_id, mapped.focus.offset);
    mapped
}
