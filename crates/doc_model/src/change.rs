//! Change summaries describing what a committed mutation did
//!
//! Derived layers decide their refresh strategy from these: the decoration
//! engine recomputes on text changes and remaps positions otherwise; the
//! heading-id stabilizer runs only when text changed.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// A single text delta within one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// The block the edit happened in
    pub block: NodeId,
    /// Block-relative grapheme offset of the edit
    pub offset: usize,
    /// Number of graphemes removed at the offset
    pub removed: usize,
    /// Number of graphemes inserted at the offset
    pub inserted: usize,
}

/// Summary of everything a command changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Whether any text content changed
    pub text_changed: bool,
    /// Whether nodes were added, removed, or re-parented
    pub structure_changed: bool,
    /// The text deltas, in application order
    pub edits: Vec<TextEdit>,
}

impl ChangeSummary {
    /// Record a text edit
    pub fn record_edit(&mut self, edit: TextEdit) {
        if edit.removed > 0 || edit.inserted > 0 {
            self.text_changed = true;
        }
        self.edits.push(edit);
    }

    /// Map a block-relative offset through the recorded edits.
    ///
    /// Offsets past a removal shift left, offsets past an insertion shift
    /// right; offsets inside a removed range collapse to its start.
    pub fn map_offset(&self, block: NodeId, mut offset: usize) -> usize {
        for edit in &self.edits {
            if edit.block != block || offset < edit.offset {
                continue;
            }
            if offset < edit.offset + edit.removed {
                offset = edit.offset;
            } else {
                offset = offset - edit.removed + edit.inserted;
            }
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_offset_through_insertion() {
        let block = NodeId::new();
        let mut summary = ChangeSummary::default();
        summary.record_edit(TextEdit {
            block,
            offset: 3,
            removed: 0,
            inserted: 5,
        });
        assert_eq!(summary.map_offset(block, 2), 2);
        assert_eq!(summary.map_offset(block, 3), 8);
        assert_eq!(summary.map_offset(block, 10), 15);
    }

    #[test]
    fn test_map_offset_through_deletion() {
        let block = NodeId::new();
        let mut summary = ChangeSummary::default();
        summary.record_edit(TextEdit {
            block,
            offset: 2,
            removed: 4,
            inserted: 0,
        });
        assert_eq!(summary.map_offset(block, 4), 2);
        assert_eq!(summary.map_offset(block, 8), 4);
    }

    #[test]
    fn test_map_offset_other_block_untouched() {
        let block = NodeId::new();
        let other = NodeId::new();
        let mut summary = ChangeSummary::default();
        summary.record_edit(TextEdit {
            block,
            offset: 0,
            removed: 2,
            inserted: 0,
        });
        assert_eq!(summary.map_offset(other, 7), 7);
    }

    #[test]
    fn test_pure_structural_change_has_no_text_flag() {
        let mut summary = ChangeSummary::default();
        summary.structure_changed = true;
        assert!(!summary.text_changed);
        summary.record_edit(TextEdit {
            block: NodeId::new(),
            offset: 0,
            removed: 0,
            inserted: 0,
        });
        assert!(!summary.text_changed);
    }
}
