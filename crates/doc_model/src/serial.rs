//! Inline serialized format primitives
//!
//! The custom element types round-trip through single-tag fragments with
//! `data-*` attributes (`<sup data-type="footnote" ...>`). `Tag` is the
//! in-memory form; reading and writing go through quick-xml so attribute
//! escaping matches what the storage layer produces.

use crate::{DocModelError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// A parsed single-element fragment: name, attributes, and inner text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Element name (e.g. "sup", "span", "img")
    pub name: String,
    attrs: Vec<(String, String)>,
    /// Inner text content (empty for void elements)
    pub inner: String,
}

impl Tag {
    /// Create a new tag with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            inner: String::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Set the inner text (builder style)
    pub fn with_inner(mut self, inner: impl Into<String>) -> Self {
        self.inner = inner.into();
        self
    }

    /// Look up an attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Serialize to an XML fragment (self-closing when there is no inner text)
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let result = if self.inner.is_empty() {
            writer.write_event(Event::Empty(start))
        } else {
            writer
                .write_event(Event::Start(start))
                .and_then(|_| writer.write_event(Event::Text(BytesText::new(&self.inner))))
                .and_then(|_| writer.write_event(Event::End(BytesEnd::new(self.name.as_str()))))
        };
        result.map_err(|e| DocModelError::MalformedElement(e.to_string()))?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| DocModelError::MalformedElement(e.to_string()))
    }

    /// Parse a single-element XML fragment
    pub fn parse(xml: &str) -> Result<Tag> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut tag: Option<Tag> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    if tag.is_some() {
                        return Err(DocModelError::MalformedElement(
                            "expected a single element".to_string(),
                        ));
                    }
                    let name = std::str::from_utf8(e.name().as_ref())
                        .map_err(|e| DocModelError::MalformedElement(e.to_string()))?
                        .to_string();
                    let mut parsed = Tag::new(name);
                    for attr in e.attributes() {
                        let attr =
                            attr.map_err(|e| DocModelError::MalformedElement(e.to_string()))?;
                        let key = std::str::from_utf8(attr.key.as_ref())
                            .map_err(|e| DocModelError::MalformedElement(e.to_string()))?
                            .to_string();
                        let value = attr
                            .unescape_value()
                            .map_err(|e| DocModelError::MalformedElement(e.to_string()))?
                            .into_owned();
                        parsed.attrs.push((key, value));
                    }
                    tag = Some(parsed);
                }
                Ok(Event::Text(t)) => {
                    if let Some(ref mut parsed) = tag {
                        let text = t
                            .unescape()
                            .map_err(|e| DocModelError::MalformedElement(e.to_string()))?;
                        parsed.inner.push_str(&text);
                    }
                }
                Ok(Event::End(_)) | Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(DocModelError::MalformedElement(e.to_string())),
            }
        }

        tag.ok_or_else(|| DocModelError::MalformedElement("empty fragment".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tag_round_trip() {
        let tag = Tag::new("sup")
            .with_attr("data-type", "footnote")
            .with_attr("data-content", "see verse 2.47");
        let xml = tag.to_xml().unwrap();
        assert_eq!(
            xml,
            "<sup data-type=\"footnote\" data-content=\"see verse 2.47\"/>"
        );
        assert_eq!(Tag::parse(&xml).unwrap(), tag);
    }

    #[test]
    fn test_inner_text_round_trip() {
        let tag = Tag::new("span")
            .with_attr("data-toc-mark", "true")
            .with_attr("data-id", "toc-abc")
            .with_inner("Chapter One");
        let xml = tag.to_xml().unwrap();
        let parsed = Tag::parse(&xml).unwrap();
        assert_eq!(parsed.inner, "Chapter One");
        assert_eq!(parsed.attr("data-id"), Some("toc-abc"));
    }

    #[test]
    fn test_attribute_escaping() {
        let tag = Tag::new("sup").with_attr("data-content", "a \"quoted\" <note> & more");
        let xml = tag.to_xml().unwrap();
        let parsed = Tag::parse(&xml).unwrap();
        assert_eq!(parsed.attr("data-content"), Some("a \"quoted\" <note> & more"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(Tag::parse("not xml at all <<<").is_err());
        assert!(Tag::parse("").is_err());
    }
}
