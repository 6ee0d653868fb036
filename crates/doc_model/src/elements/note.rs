//! Footnotes and special notes
//!
//! A note is an atomic inline node: its body text lives in the `content`
//! attribute, never in children. The display ordinal is derived at query
//! time by counting preceding notes of the same kind; it is never stored.

use crate::{AttrValue, Node, NodeType};
use serde::{Deserialize, Serialize};

/// Attribute key for the note kind
pub const ATTR_NOTE_KIND: &str = "noteKind";
/// Attribute key for the note body text
pub const ATTR_CONTENT: &str = "content";

/// Kind of note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoteKind {
    /// Numbered footnote
    #[default]
    Footnote,
    /// Special note, marked with the symbol cycle instead of a number
    Special,
}

impl NoteKind {
    /// The attribute value stored on the node
    pub fn attr_value(&self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Special => "special",
        }
    }

    /// Parse from the stored attribute value
    pub fn from_attr_value(value: &str) -> Option<Self> {
        match value {
            "footnote" => Some(NoteKind::Footnote),
            "special" => Some(NoteKind::Special),
            _ => None,
        }
    }

    /// The `data-type` value used in the serialized form
    pub fn serial_name(&self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Special => "specialnote",
        }
    }

    /// Parse from the serialized `data-type` value
    pub fn from_serial_name(name: &str) -> Option<Self> {
        match name {
            "footnote" => Some(NoteKind::Footnote),
            "specialnote" => Some(NoteKind::Special),
            _ => None,
        }
    }
}

/// Create a note node of the given kind with body text
pub fn note(kind: NoteKind, content: impl Into<String>) -> Node {
    let mut node = Node::new(NodeType::Note);
    node.attributes
        .insert(ATTR_NOTE_KIND.to_string(), AttrValue::from(kind.attr_value()));
    node.attributes
        .insert(ATTR_CONTENT.to_string(), AttrValue::Str(content.into()));
    node
}

/// The kind of a note node
pub fn note_kind(node: &Node) -> Option<NoteKind> {
    if node.node_type != NodeType::Note {
        return None;
    }
    node.attr_str(ATTR_NOTE_KIND)
        .and_then(NoteKind::from_attr_value)
}

/// The body text of a note node
pub fn note_content(node: &Node) -> Option<&str> {
    if node.node_type != NodeType::Note {
        return None;
    }
    node.attr_str(ATTR_CONTENT)
}

/// Format a derived ordinal for display.
///
/// Footnotes use arabic numerals. Special notes use the conventional symbol
/// cycle, doubling after each full cycle (*, †, ‡, §, ¶, ‖, **, ††, ...).
pub fn format_ordinal(kind: NoteKind, ordinal: u32) -> String {
    match kind {
        NoteKind::Footnote => ordinal.to_string(),
        NoteKind::Special => to_symbol(ordinal),
    }
}

fn to_symbol(n: u32) -> String {
    if n == 0 {
        return String::new();
    }

    const SYMBOLS: [char; 6] = [
        '*',        // asterisk
        '\u{2020}', // dagger
        '\u{2021}', // double dagger
        '\u{00A7}', // section sign
        '\u{00B6}', // pilcrow
        '\u{2016}', // double vertical bar
    ];

    let cycle = ((n - 1) / 6) + 1;
    let index = ((n - 1) % 6) as usize;
    std::iter::repeat(SYMBOLS[index])
        .take(cycle as usize)
        .collect()
}
