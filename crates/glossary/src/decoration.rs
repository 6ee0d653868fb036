//! Decorations - derived, non-persisted highlight records

use doc_model::{ChangeSummary, NodeId};
use serde::{Deserialize, Serialize};

/// Tooltip content for a decorated span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPayload {
    /// The dictionary term as supplied (unstemmed)
    pub term: String,
    /// Romanized transliteration
    pub transliteration: String,
    /// Definition text
    pub definition: String,
}

/// A highlighted span over a block's text
///
/// Decorations are derived from document text plus the dictionary; they are
/// never stored in the document and can always be recomputed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// The block the span lives in
    pub block: NodeId,
    /// Grapheme offset of the span start within the block
    pub from: usize,
    /// Grapheme offset one past the span end
    pub to: usize,
    /// CSS class for the highlight
    pub css_class: String,
    /// Tooltip content
    pub tooltip: TooltipPayload,
}

/// The full decoration overlay for one document version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
    /// The document version this set was derived from
    version: u64,
}

impl DecorationSet {
    /// Create a set from decorations derived at a document version
    pub fn new(decorations: Vec<Decoration>, version: u64) -> Self {
        Self {
            decorations,
            version,
        }
    }

    /// The document version this set reflects
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All decorations in block order of computation
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    /// Decorations within one block
    pub fn for_block(&self, block: NodeId) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter().filter(move |d| d.block == block)
    }

    /// Number of decorations
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    /// Whether the overlay is empty
    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Remap decoration positions through a change summary.
    ///
    /// Used for changes that did not alter text: every span shifts through
    /// the recorded edits instead of being recomputed. A span an edit landed
    /// inside is dropped; the next recomputation will restore it if the term
    /// still matches.
    pub fn remap(&self, summary: &ChangeSummary, version: u64) -> Self {
        let decorations = self
            .decorations
            .iter()
            .filter(|d| {
                !summary.edits.iter().any(|e| {
                    e.block == d.block
                        && e.offset < d.to
                        && e.offset + e.removed > d.from
                        && (e.removed > 0 || e.inserted > 0)
                })
            })
            .map(|d| {
                let mut mapped = d.clone();
                mapped.from = summary.map_offset(d.block, d.from);
                mapped.to = summary.map_offset(d.block, d.to);
                mapped
            })
            .filter(|d| d.from < d.to)
            .collect();
        Self {
            decorations,
            version,
        }
    }
}
