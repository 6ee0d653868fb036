//! Alternate reading marks
//!
//! An AlternateReading mark records multiple textual versions of a passage;
//! the first version is the default display. At least one version is
//! required, and toggling the mark off discards all versions.

use crate::{AttrValue, Attributes, DocModelError, Mark, MarkType, Result};

/// Attribute key for the ordered versions list
pub const ATTR_VERSIONS: &str = "versions";

/// Create an AlternateReading mark; rejects an empty versions list
pub fn alternate_reading_mark(versions: Vec<String>) -> Result<Mark> {
    if versions.is_empty() {
        return Err(DocModelError::MalformedElement(
            "alternate reading requires at least one version".to_string(),
        ));
    }
    let mut attributes = Attributes::new();
    attributes.insert(ATTR_VERSIONS.to_string(), AttrValue::List(versions));
    Ok(Mark::with_attributes(MarkType::AlternateReading, attributes))
}

/// The ordered versions of an AlternateReading mark
pub fn versions(mark: &Mark) -> Vec<String> {
    if mark.mark_type != MarkType::AlternateReading {
        return Vec::new();
    }
    mark.attributes
        .get(ATTR_VERSIONS)
        .and_then(AttrValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// The default (first) version of an AlternateReading mark
pub fn default_version(mark: &Mark) -> Option<String> {
    versions(mark).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_versions_rejected() {
        assert!(alternate_reading_mark(Vec::new()).is_err());
    }

    #[test]
    fn test_first_version_is_default() {
        let mark =
            alternate_reading_mark(vec!["pracodayat".to_string(), "pracodayate".to_string()])
                .unwrap();
        assert_eq!(default_version(&mark), Some("pracodayat".to_string()));
        assert_eq!(versions(&mark).len(), 2);
    }
}
