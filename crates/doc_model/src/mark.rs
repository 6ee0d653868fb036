//! Marks - attribute bundles applied to text runs
//!
//! A mark attaches a `{type, attributes}` pair to a contiguous run of text.
//! Multiple marks may overlap on the same run. Each mark type declares its
//! boundary inclusivity: typing at the edge of an inclusive mark extends it,
//! while non-inclusive marks (table-of-contents anchors) do not grow.

use crate::{AttrValue, Attributes};
use serde::{Deserialize, Serialize};

/// Enumeration of all mark types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkType {
    /// Bold emphasis
    Bold,
    /// Italic emphasis
    Italic,
    /// Hyperlink to an external target
    Link,
    /// Table-of-contents anchor (non-inclusive)
    TocAnchor,
    /// Alternate textual readings of a passage
    AlternateReading,
    /// Mention of a discoverable user
    Mention,
    /// Topic tag
    Tag,
    /// Meta tag (editorial classification)
    MetaTag,
}

impl MarkType {
    /// Whether typing at the mark boundary extends the mark
    pub fn is_inclusive(&self) -> bool {
        !matches!(self, MarkType::TocAnchor)
    }

    /// The stable name used in the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            MarkType::Bold => "bold",
            MarkType::Italic => "italic",
            MarkType::Link => "link",
            MarkType::TocAnchor => "tocAnchor",
            MarkType::AlternateReading => "alternateReading",
            MarkType::Mention => "mention",
            MarkType::Tag => "tag",
            MarkType::MetaTag => "metaTag",
        }
    }

    /// Parse a mark type from its serialized name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(MarkType::Bold),
            "italic" => Some(MarkType::Italic),
            "link" => Some(MarkType::Link),
            "tocAnchor" => Some(MarkType::TocAnchor),
            "alternateReading" => Some(MarkType::AlternateReading),
            "mention" => Some(MarkType::Mention),
            "tag" => Some(MarkType::Tag),
            "metaTag" => Some(MarkType::MetaTag),
            _ => None,
        }
    }
}

/// A mark applied to a text run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    /// The type of this mark
    pub mark_type: MarkType,
    /// Attributes carried by the mark
    pub attributes: Attributes,
}

impl Mark {
    /// Create a new mark with no attributes
    pub fn new(mark_type: MarkType) -> Self {
        Self {
            mark_type,
            attributes: Attributes::new(),
        }
    }

    /// Create a new mark with attributes
    pub fn with_attributes(mark_type: MarkType, attributes: Attributes) -> Self {
        Self {
            mark_type,
            attributes,
        }
    }

    /// Get a string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(AttrValue::as_str)
    }

    /// Check if a set of marks contains a mark of the given type
    pub fn set_contains(marks: &[Mark], mark_type: MarkType) -> bool {
        marks.iter().any(|m| m.mark_type == mark_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toc_anchor_is_non_inclusive() {
        assert!(!MarkType::TocAnchor.is_inclusive());
        assert!(MarkType::Bold.is_inclusive());
        assert!(MarkType::AlternateReading.is_inclusive());
    }

    #[test]
    fn test_mark_name_round_trip() {
        for mt in [
            MarkType::Bold,
            MarkType::Italic,
            MarkType::Link,
            MarkType::TocAnchor,
            MarkType::AlternateReading,
            MarkType::Mention,
            MarkType::Tag,
            MarkType::MetaTag,
        ] {
            assert_eq!(MarkType::from_name(mt.name()), Some(mt));
        }
    }

    #[test]
    fn test_set_contains() {
        let marks = vec![Mark::new(MarkType::Bold), Mark::new(MarkType::Link)];
        assert!(Mark::set_contains(&marks, MarkType::Link));
        assert!(!Mark::set_contains(&marks, MarkType::Tag));
    }
}
