//! Styled image commands

use crate::{Command, EditError, Operation, Result};
use doc_model::elements::{styled_image, ATTR_ALIGN_CLASS, ATTR_WIDTH_STYLE};
use doc_model::{attrs, AttrValue, Attributes, DocumentTree, NodeId, NodeType, Position};

/// Build a command inserting an inline styled image
pub fn insert_image(
    position: Position,
    src: impl Into<String>,
    alt: impl Into<String>,
) -> Command {
    Command::single(
        "Insert Image",
        Operation::InsertInline {
            position,
            node: styled_image(src, alt),
        },
    )
}

fn image_attr_command(
    tree: &DocumentTree,
    node_id: NodeId,
    name: &'static str,
    key: &str,
    value: Option<&str>,
) -> Result<Command> {
    let node = tree
        .get(node_id)
        .ok_or(doc_model::DocModelError::NodeNotFound(node_id.as_uuid()))?;
    if node.node_type != NodeType::StyledImage {
        return Err(EditError::InvalidCommand(format!(
            "{} is not an image",
            node.node_type.name()
        )));
    }
    let (set, unset) = match value {
        Some(v) => (attrs([(key, AttrValue::from(v))]), Vec::new()),
        None => (Attributes::new(), vec![key.to_string()]),
    };
    Ok(Command::single(
        name,
        Operation::SetAttributes { node_id, set, unset },
    ))
}

/// Set or clear an image's alignment class; its width style is untouched
pub fn set_image_alignment(
    tree: &DocumentTree,
    node_id: NodeId,
    class: Option<&str>,
) -> Result<Command> {
    image_attr_command(tree, node_id, "Set Image Alignment", ATTR_ALIGN_CLASS, class)
}

/// Set or clear an image's width style; its alignment class is untouched
pub fn set_image_width(
    tree: &DocumentTree,
    node_id: NodeId,
    style: Option<&str>,
) -> Result<Command> {
    image_attr_command(tree, node_id, "Set Image Width", ATTR_WIDTH_STYLE, style)
}
