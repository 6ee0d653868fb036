//! Table-of-contents anchor marks
//!
//! A TocAnchor is a non-inclusive mark over a text range. Its id is
//! generated once when the mark is created and stays stable until the mark
//! is removed, so external links to the anchor keep working.

use crate::{AttrValue, Attributes, Mark, MarkType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribute key for the anchor id
pub const ATTR_ANCHOR_ID: &str = "anchorId";

/// Stable identifier for a table-of-contents anchor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(String);

impl AnchorId {
    /// Generate a fresh anchor id
    pub fn generate() -> Self {
        Self(format!("toc-{}", Uuid::new_v4().simple()))
    }

    /// Wrap an existing id (from the serialized form)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Create a TocAnchor mark for the given id
pub fn toc_anchor_mark(id: &AnchorId) -> Mark {
    let mut attributes = Attributes::new();
    attributes.insert(
        ATTR_ANCHOR_ID.to_string(),
        AttrValue::Str(id.as_str().to_string()),
    );
    Mark::with_attributes(MarkType::TocAnchor, attributes)
}

/// The anchor id of a TocAnchor mark
pub fn anchor_id(mark: &Mark) -> Option<AnchorId> {
    if mark.mark_type != MarkType::TocAnchor {
        return None;
    }
    mark.attr_str(ATTR_ANCHOR_ID).map(AnchorId::new)
}
