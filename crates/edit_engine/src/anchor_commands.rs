//! Table-of-contents anchor commands

use crate::{Command, Operation, Result};
use doc_model::elements::{anchor_id, toc_anchor_mark, AnchorId};
use doc_model::{DocumentTree, MarkType, Position};
use unicode_segmentation::UnicodeSegmentation;

/// The anchor covering any part of the range, if one exists
pub fn anchor_in_range(
    tree: &DocumentTree,
    start: Position,
    end: Position,
) -> Result<Option<AnchorId>> {
    let (block, start_offset) = tree.resolve_block_offset(&start)?;
    let (_, end_offset) = tree.resolve_block_offset(&end)?;

    for run in tree.text_runs(block) {
        let len = run.text.graphemes(true).count();
        if run.start + len <= start_offset || run.start >= end_offset {
            continue;
        }
        for mark in &run.marks {
            if let Some(id) = anchor_id(mark) {
                return Ok(Some(id));
            }
        }
    }
    Ok(None)
}

/// Build a command toggling a TOC anchor over the range.
///
/// Toggling on generates the anchor id once; it stays stable until the mark
/// is removed. Toggling off removes the mark and the id with it.
pub fn toggle_toc_anchor(tree: &DocumentTree, start: Position, end: Position) -> Result<Command> {
    if anchor_in_range(tree, start, end)?.is_some() {
        return Ok(Command::single(
            "Remove TOC Anchor",
            Operation::RemoveMark {
                start,
                end,
                mark_type: MarkType::TocAnchor,
            },
        ));
    }

    let id = AnchorId::generate();
    Ok(Command::single(
        "Add TOC Anchor",
        Operation::AddMark {
            start,
            end,
            mark: toc_anchor_mark(&id),
        },
    ))
}
