//! Element registry - tagged-variant dispatch for custom element types
//!
//! Maps each custom type name to a bundle of parse/serialize/default rules
//! plus its structural shape. Render and storage layers look elements up
//! here instead of switching on node types, so new element kinds stay
//! additive. Registering a type also makes it constructible through the
//! generic insert-element command.

use crate::elements::{
    citation, image, note, reading, toc_anchor, NoteKind, ATTR_ALIGN_CLASS, ATTR_ALT,
    ATTR_ANCHOR_ID, ATTR_CONTENT, ATTR_NOTE_KIND, ATTR_REF_ID, ATTR_SRC, ATTR_VERSIONS,
    ATTR_WIDTH_STYLE,
};
use crate::{
    AttrValue, Attributes, DocModelError, Mark, MarkType, Node, NodeType, Result, Tag,
};

/// Structural shape of a registered element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// Atomic inline node; selected and deleted as a unit
    AtomicInline,
    /// Atomic block node
    AtomicBlock,
    /// Mark applied over a text range
    Mark,
}

/// Result of parsing a serialized fragment
#[derive(Debug, Clone)]
pub enum ParsedElement {
    /// A standalone node
    Node(Node),
    /// A mark plus the text it wrapped
    Mark { mark: Mark, text: String },
}

/// Parse / serialize / default bundle for one element type
pub struct ElementSpec {
    /// Stable type name ("note", "citation", ...)
    pub type_name: &'static str,
    /// Structural shape
    pub shape: ElementShape,
    /// Node type, for node-shaped elements
    pub node_type: Option<NodeType>,
    /// Mark type, for mark-shaped elements
    pub mark_type: Option<MarkType>,
    /// Default attribute set for generic construction
    pub defaults: fn() -> Attributes,
    /// Recognize the serialized form
    pub recognize: fn(&Tag) -> bool,
    /// Extract attributes from the serialized form
    pub parse: fn(&Tag) -> Result<Attributes>,
    /// Produce the serialized form; `inner` is the wrapped text for marks
    pub serialize: fn(&Attributes, &str) -> Result<Tag>,
}

impl ElementSpec {
    /// Whether this element is atomic (never entered for child editing)
    pub fn is_atomic(&self) -> bool {
        matches!(self.shape, ElementShape::AtomicInline | ElementShape::AtomicBlock)
    }
}

/// Registry of custom element types
pub struct ElementRegistry {
    specs: Vec<ElementSpec>,
}

impl ElementRegistry {
    /// Create a registry with the built-in scholarly element types
    pub fn builtin() -> Self {
        let mut registry = Self { specs: Vec::new() };
        registry.register(note_spec());
        registry.register(citation_spec());
        registry.register(toc_anchor_spec());
        registry.register(alternate_reading_spec());
        registry.register(styled_image_spec());
        registry
    }

    /// Register an element type
    pub fn register(&mut self, spec: ElementSpec) {
        self.specs.retain(|s| s.type_name != spec.type_name);
        self.specs.push(spec);
    }

    /// Look up a spec by type name
    pub fn get(&self, type_name: &str) -> Option<&ElementSpec> {
        self.specs.iter().find(|s| s.type_name == type_name)
    }

    /// Construct a node of a registered node-shaped type, with the given
    /// attributes merged over the type's defaults
    pub fn construct_node(&self, type_name: &str, attributes: Attributes) -> Result<Node> {
        let spec = self
            .get(type_name)
            .ok_or_else(|| DocModelError::UnknownElementType(type_name.to_string()))?;
        let node_type = spec
            .node_type
            .ok_or_else(|| DocModelError::MalformedElement(format!(
                "{type_name} is a mark, not a node"
            )))?;

        let mut merged = (spec.defaults)();
        merged.extend(attributes);
        let mut node = Node::with_attributes(node_type, merged);
        if spec.shape == ElementShape::AtomicBlock {
            node.kind = crate::NodeKind::Block;
        }
        Ok(node)
    }

    /// Serialize a node-shaped element to its inline form
    pub fn serialize_node(&self, node: &Node) -> Result<String> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.node_type == Some(node.node_type))
            .ok_or_else(|| DocModelError::UnknownElementType(node.node_type.name().to_string()))?;
        (spec.serialize)(&node.attributes, "")?.to_xml()
    }

    /// Serialize a mark-shaped element wrapping the given text
    pub fn serialize_mark(&self, mark: &Mark, text: &str) -> Result<String> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.mark_type == Some(mark.mark_type))
            .ok_or_else(|| DocModelError::UnknownElementType(mark.mark_type.name().to_string()))?;
        (spec.serialize)(&mark.attributes, text)?.to_xml()
    }

    /// Parse a serialized fragment into the element it encodes
    pub fn parse_fragment(&self, xml: &str) -> Result<ParsedElement> {
        let tag = Tag::parse(xml)?;
        let spec = self
            .specs
            .iter()
            .find(|s| (s.recognize)(&tag))
            .ok_or_else(|| DocModelError::UnknownElementType(tag.name.clone()))?;

        let attributes = (spec.parse)(&tag)?;
        match spec.shape {
            ElementShape::Mark => {
                let mark_type = spec.mark_type.ok_or_else(|| {
                    DocModelError::MalformedElement("mark shape without mark type".to_string())
                })?;
                Ok(ParsedElement::Mark {
                    mark: Mark::with_attributes(mark_type, attributes),
                    text: tag.inner,
                })
            }
            _ => {
                let node = self.construct_node(spec.type_name, attributes)?;
                Ok(ParsedElement::Node(node))
            }
        }
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ----------------------------------------------------------------------------
// Built-in element specs
// ----------------------------------------------------------------------------

fn note_spec() -> ElementSpec {
    ElementSpec {
        type_name: "note",
        shape: ElementShape::AtomicInline,
        node_type: Some(NodeType::Note),
        mark_type: None,
        defaults: || {
            let mut a = Attributes::new();
            a.insert(ATTR_NOTE_KIND.to_string(), AttrValue::from("footnote"));
            a.insert(ATTR_CONTENT.to_string(), AttrValue::from(""));
            a
        },
        recognize: |tag| tag.name == "sup" && tag.attr("data-type").is_some(),
        parse: |tag| {
            let kind = tag
                .attr("data-type")
                .and_then(NoteKind::from_serial_name)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("note with unknown data-type".to_string())
                })?;
            let content = tag.attr("data-content").unwrap_or_default();
            Ok(note::note(kind, content).attributes)
        },
        serialize: |attrs, _| {
            let kind = attrs
                .get(ATTR_NOTE_KIND)
                .and_then(AttrValue::as_str)
                .and_then(NoteKind::from_attr_value)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("note without noteKind".to_string())
                })?;
            let content = attrs
                .get(ATTR_CONTENT)
                .and_then(AttrValue::as_str)
                .unwrap_or_default();
            Ok(Tag::new("sup")
                .with_attr("data-type", kind.serial_name())
                .with_attr("data-content", content))
        },
    }
}

fn citation_spec() -> ElementSpec {
    ElementSpec {
        type_name: "citation",
        shape: ElementShape::AtomicBlock,
        node_type: Some(NodeType::Citation),
        mark_type: None,
        defaults: Attributes::new,
        recognize: |tag| tag.name == "div" && tag.attr("data-citation-node") == Some("true"),
        parse: |tag| {
            let ref_id = tag.attr("data-ref-id").ok_or_else(|| {
                DocModelError::MalformedElement("citation without data-ref-id".to_string())
            })?;
            Ok(citation::citation(ref_id).attributes)
        },
        serialize: |attrs, _| {
            let ref_id = attrs
                .get(ATTR_REF_ID)
                .and_then(AttrValue::as_str)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("citation without refId".to_string())
                })?;
            Ok(Tag::new("div")
                .with_attr("data-citation-node", "true")
                .with_attr("data-ref-id", ref_id))
        },
    }
}

fn toc_anchor_spec() -> ElementSpec {
    ElementSpec {
        type_name: "tocAnchor",
        shape: ElementShape::Mark,
        node_type: None,
        mark_type: Some(MarkType::TocAnchor),
        defaults: Attributes::new,
        recognize: |tag| tag.name == "span" && tag.attr("data-toc-mark") == Some("true"),
        parse: |tag| {
            let id = tag.attr("data-id").ok_or_else(|| {
                DocModelError::MalformedElement("toc anchor without data-id".to_string())
            })?;
            Ok(toc_anchor::toc_anchor_mark(&toc_anchor::AnchorId::new(id)).attributes)
        },
        serialize: |attrs, inner| {
            let id = attrs
                .get(ATTR_ANCHOR_ID)
                .and_then(AttrValue::as_str)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("toc anchor without anchorId".to_string())
                })?;
            Ok(Tag::new("span")
                .with_attr("data-toc-mark", "true")
                .with_attr("data-id", id)
                .with_inner(inner))
        },
    }
}

fn alternate_reading_spec() -> ElementSpec {
    ElementSpec {
        type_name: "alternateReading",
        shape: ElementShape::Mark,
        node_type: None,
        mark_type: Some(MarkType::AlternateReading),
        defaults: Attributes::new,
        recognize: |tag| tag.name == "span" && tag.attr("data-versions").is_some(),
        parse: |tag| {
            let raw = tag.attr("data-versions").unwrap_or("[]");
            let versions: Vec<String> = serde_json::from_str(raw).map_err(|e| {
                DocModelError::MalformedElement(format!("bad data-versions payload: {e}"))
            })?;
            Ok(reading::alternate_reading_mark(versions)?.attributes)
        },
        serialize: |attrs, inner| {
            let versions = attrs
                .get(ATTR_VERSIONS)
                .and_then(AttrValue::as_list)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("alternate reading without versions".to_string())
                })?;
            let payload = serde_json::to_string(versions).map_err(|e| {
                DocModelError::MalformedElement(format!("versions not serializable: {e}"))
            })?;
            Ok(Tag::new("span")
                .with_attr("data-versions", payload)
                .with_inner(inner))
        },
    }
}

fn styled_image_spec() -> ElementSpec {
    ElementSpec {
        type_name: "styledImage",
        shape: ElementShape::AtomicInline,
        node_type: Some(NodeType::StyledImage),
        mark_type: None,
        defaults: || {
            let mut a = Attributes::new();
            a.insert(ATTR_ALT.to_string(), AttrValue::from(""));
            a
        },
        recognize: |tag| tag.name == "img",
        parse: |tag| {
            let src = tag.attr("src").ok_or_else(|| {
                DocModelError::MalformedElement("image without src".to_string())
            })?;
            let mut node = image::styled_image(src, tag.attr("alt").unwrap_or_default());
            image::set_alignment(&mut node, tag.attr("class"));
            image::set_width(&mut node, tag.attr("style"));
            Ok(node.attributes)
        },
        serialize: |attrs, _| {
            let src = attrs
                .get(ATTR_SRC)
                .and_then(AttrValue::as_str)
                .ok_or_else(|| {
                    DocModelError::MalformedElement("image without src".to_string())
                })?;
            let mut tag = Tag::new("img").with_attr("src", src).with_attr(
                "alt",
                attrs.get(ATTR_ALT).and_then(AttrValue::as_str).unwrap_or_default(),
            );
            if let Some(class) = attrs.get(ATTR_ALIGN_CLASS).and_then(AttrValue::as_str) {
                tag = tag.with_attr("class", class);
            }
            if let Some(style) = attrs.get(ATTR_WIDTH_STYLE).and_then(AttrValue::as_str) {
                tag = tag.with_attr("style", style);
            }
            Ok(tag)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{self, NoteKind};

    #[test]
    fn test_citation_round_trip() {
        let registry = ElementRegistry::builtin();
        let node = elements::citation("gita-2-47");
        let xml = registry.serialize_node(&node).unwrap();
        assert!(xml.contains("data-citation-node=\"true\""));
        assert!(xml.contains("data-ref-id=\"gita-2-47\""));

        match registry.parse_fragment(&xml).unwrap() {
            ParsedElement::Node(parsed) => {
                assert_eq!(parsed.node_type, NodeType::Citation);
                assert_eq!(elements::ref_id(&parsed), Some(elements::RefId::new("gita-2-47")));
            }
            ParsedElement::Mark { .. } => panic!("citation parsed as mark"),
        }
    }

    #[test]
    fn test_note_round_trip_preserves_kind() {
        let registry = ElementRegistry::builtin();
        let node = elements::note(NoteKind::Special, "variant in the Kashmiri recension");
        let xml = registry.serialize_node(&node).unwrap();
        assert!(xml.contains("data-type=\"specialnote\""));

        match registry.parse_fragment(&xml).unwrap() {
            ParsedElement::Node(parsed) => {
                assert_eq!(elements::note_kind(&parsed), Some(NoteKind::Special));
                assert_eq!(
                    elements::note_content(&parsed),
                    Some("variant in the Kashmiri recension")
                );
            }
            ParsedElement::Mark { .. } => panic!("note parsed as mark"),
        }
    }

    #[test]
    fn test_alternate_reading_versions_json_round_trip() {
        let registry = ElementRegistry::builtin();
        let mark = elements::alternate_reading_mark(vec![
            "dhimahi".to_string(),
            "dhimahe".to_string(),
        ])
        .unwrap();
        let xml = registry.serialize_mark(&mark, "dhimahi").unwrap();

        match registry.parse_fragment(&xml).unwrap() {
            ParsedElement::Mark { mark: parsed, text } => {
                assert_eq!(elements::versions(&parsed), vec!["dhimahi", "dhimahe"]);
                assert_eq!(text, "dhimahi");
            }
            ParsedElement::Node(_) => panic!("reading parsed as node"),
        }
    }

    #[test]
    fn test_alternate_reading_empty_versions_rejected() {
        let registry = ElementRegistry::builtin();
        let xml = "<span data-versions=\"[]\">x</span>";
        assert!(registry.parse_fragment(xml).is_err());
    }

    #[test]
    fn test_toc_anchor_round_trip() {
        let registry = ElementRegistry::builtin();
        let id = elements::AnchorId::new("toc-0a1b2c");
        let mark = elements::toc_anchor_mark(&id);
        let xml = registry.serialize_mark(&mark, "Sadhana Pada").unwrap();

        match registry.parse_fragment(&xml).unwrap() {
            ParsedElement::Mark { mark: parsed, text } => {
                assert_eq!(elements::anchor_id(&parsed), Some(id));
                assert_eq!(text, "Sadhana Pada");
            }
            ParsedElement::Node(_) => panic!("anchor parsed as node"),
        }
    }

    #[test]
    fn test_image_class_and_style_optional() {
        let registry = ElementRegistry::builtin();
        let mut node = elements::styled_image("/img/yantra.webp", "yantra");
        elements::set_width(&mut node, Some("width: 75%"));
        let xml = registry.serialize_node(&node).unwrap();
        assert!(xml.contains("style=\"width: 75%\""));
        assert!(!xml.contains("class="));

        match registry.parse_fragment(&xml).unwrap() {
            ParsedElement::Node(parsed) => {
                assert_eq!(elements::width_style(&parsed), Some("width: 75%"));
                assert_eq!(elements::align_class(&parsed), None);
            }
            ParsedElement::Mark { .. } => panic!("image parsed as mark"),
        }
    }

    #[test]
    fn test_generic_construction_uses_defaults() {
        let registry = ElementRegistry::builtin();
        let node = registry.construct_node("note", Attributes::new()).unwrap();
        assert_eq!(elements::note_kind(&node), Some(NoteKind::Footnote));
        assert_eq!(elements::note_content(&node), Some(""));
    }

    #[test]
    fn test_unknown_fragment_rejected() {
        let registry = ElementRegistry::builtin();
        assert!(matches!(
            registry.parse_fragment("<video src=\"x\"/>"),
            Err(DocModelError::UnknownElementType(_))
        ));
    }
}
