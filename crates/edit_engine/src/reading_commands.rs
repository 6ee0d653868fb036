//! Alternate reading commands

use crate::{Command, EditError, Operation, Result};
use doc_model::elements::{alternate_reading_mark, versions};
use doc_model::{DocumentTree, MarkType, Position};
use unicode_segmentation::UnicodeSegmentation;

/// The versions of any alternate reading covering the range
pub fn readings_in_range(
    tree: &DocumentTree,
    start: Position,
    end: Position,
) -> Result<Option<Vec<String>>> {
    let (block, start_offset) = tree.resolve_block_offset(&start)?;
    let (_, end_offset) = tree.resolve_block_offset(&end)?;

    for run in tree.text_runs(block) {
        let len = run.text.graphemes(true).count();
        if run.start + len <= start_offset || run.start >= end_offset {
            continue;
        }
        for mark in &run.marks {
            if mark.mark_type == MarkType::AlternateReading {
                return Ok(Some(versions(mark)));
            }
        }
    }
    Ok(None)
}

/// Build a command toggling an alternate reading over the range.
///
/// Toggling on requires at least one version; toggling off discards all
/// versions with the mark.
pub fn toggle_alternate_reading(
    tree: &DocumentTree,
    start: Position,
    end: Position,
    reading_versions: Vec<String>,
) -> Result<Command> {
    if readings_in_range(tree, start, end)?.is_some() {
        return Ok(Command::single(
            "Remove Alternate Reading",
            Operation::RemoveMark {
                start,
                end,
                mark_type: MarkType::AlternateReading,
            },
        ));
    }

    if reading_versions.is_empty() {
        return Err(EditError::EmptyVersionsSet);
    }
    let mark = alternate_reading_mark(reading_versions)?;
    Ok(Command::single(
        "Add Alternate Reading",
        Operation::AddMark { start, end, mark },
    ))
}
