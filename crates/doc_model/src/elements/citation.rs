//! Citation nodes - references to externally stored scripture content
//!
//! A citation is an atomic block carrying only a `refId`; the referenced
//! content is resolved by a collaborator and never cached on the node.

use crate::{AttrValue, Node, NodeType};
use serde::{Deserialize, Serialize};

/// Attribute key for the external reference id
pub const ATTR_REF_ID: &str = "refId";

/// Identifier of an externally stored citation (e.g. "gita-2-47")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefId(String);

impl RefId {
    /// Create a new reference id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RefId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RefId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Externally resolved citation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// The reference id this record resolves
    pub ref_id: RefId,
    /// Source work (e.g. "Bhagavad Gita")
    pub source: String,
    /// Location within the source (e.g. "2.47")
    pub location: String,
    /// Preview of the original-script text
    pub preview: String,
}

/// Resolution state of an asynchronous citation lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveState {
    /// Lookup in flight; render a loading placeholder
    Loading,
    /// Content resolved
    Ready(CitationRecord),
    /// The reference does not exist
    Missing,
}

impl ResolveState {
    /// The text a renderer should display for this state.
    ///
    /// A missing reference degrades to the raw ref id rather than failing.
    pub fn display_text(&self, ref_id: &RefId) -> String {
        match self {
            ResolveState::Loading => "loading\u{2026}".to_string(),
            ResolveState::Ready(record) => {
                format!("{} {}", record.source, record.location)
            }
            ResolveState::Missing => ref_id.as_str().to_string(),
        }
    }
}

/// Collaborator interface for citation lookup by reference id
pub trait CitationSource: Send + Sync {
    /// Resolve a reference id, or None when the reference does not exist
    fn by_ref_id(&self, ref_id: &RefId) -> Option<CitationRecord>;
}

/// Create a citation node for a reference id
pub fn citation(ref_id: impl Into<RefId>) -> Node {
    let mut node = Node::new(NodeType::Citation);
    node.attributes.insert(
        ATTR_REF_ID.to_string(),
        AttrValue::Str(ref_id.into().as_str().to_string()),
    );
    node
}

/// The reference id of a citation node
pub fn ref_id(node: &Node) -> Option<RefId> {
    if node.node_type != NodeType::Citation {
        return None;
    }
    node.attr_str(ATTR_REF_ID).map(RefId::from)
}
