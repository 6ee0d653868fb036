//! Styled image nodes
//!
//! Images carry two independent presentation attributes: an alignment class
//! and a width style. Setting one never touches the other.

use crate::{AttrValue, Node, NodeKind, NodeType};

/// Attribute key for the image source
pub const ATTR_SRC: &str = "src";
/// Attribute key for the alternative text
pub const ATTR_ALT: &str = "alt";
/// Attribute key for the alignment CSS class
pub const ATTR_ALIGN_CLASS: &str = "alignClass";
/// Attribute key for the width CSS style
pub const ATTR_WIDTH_STYLE: &str = "widthStyle";

/// Create an inline styled image
pub fn styled_image(src: impl Into<String>, alt: impl Into<String>) -> Node {
    let mut node = Node::new(NodeType::StyledImage);
    node.attributes
        .insert(ATTR_SRC.to_string(), AttrValue::Str(src.into()));
    node.attributes
        .insert(ATTR_ALT.to_string(), AttrValue::Str(alt.into()));
    node
}

/// Create a block-level styled image
pub fn styled_image_block(src: impl Into<String>, alt: impl Into<String>) -> Node {
    let mut node = styled_image(src, alt);
    node.kind = NodeKind::Block;
    node
}

/// Set or clear the alignment class; the width style is untouched
pub fn set_alignment(node: &mut Node, class: Option<&str>) {
    match class {
        Some(c) => {
            node.attributes
                .insert(ATTR_ALIGN_CLASS.to_string(), AttrValue::from(c));
        }
        None => {
            node.attributes.remove(ATTR_ALIGN_CLASS);
        }
    }
}

/// Set or clear the width style; the alignment class is untouched
pub fn set_width(node: &mut Node, style: Option<&str>) {
    match style {
        Some(s) => {
            node.attributes
                .insert(ATTR_WIDTH_STYLE.to_string(), AttrValue::from(s));
        }
        None => {
            node.attributes.remove(ATTR_WIDTH_STYLE);
        }
    }
}

/// The alignment class, if set
pub fn align_class(node: &Node) -> Option<&str> {
    node.attr_str(ATTR_ALIGN_CLASS)
}

/// The width style, if set
pub fn width_style(node: &Node) -> Option<&str> {
    node.attr_str(ATTR_WIDTH_STYLE)
}
