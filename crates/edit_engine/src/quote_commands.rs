//! Quote capture and suggestion-commit builders
//!
//! These commands replace a range (the trigger text, or a captured passage)
//! with the structured content the interaction produced: a citation node, an
//! attributed blockquote, or a marked mention/tag run.

use crate::{Command, InlinePiece, Operation, Replacement};
use doc_model::elements::citation;
use doc_model::{attrs, AttrValue, Attributes, Mark, MarkType, Node, Position};

/// Attribute key distinguishing plain from attributed blockquotes
pub const ATTR_QUOTE_STYLE: &str = "quoteStyle";
/// Attribute key for the quoted author
pub const ATTR_AUTHOR: &str = "author";
/// Attribute key for the quoted work's title
pub const ATTR_TITLE: &str = "title";

fn attributed_blockquote(author: &str, title: &str) -> Node {
    let mut node = Node::blockquote();
    node.attributes = attrs([
        (ATTR_QUOTE_STYLE, AttrValue::from("attributed")),
        (ATTR_AUTHOR, AttrValue::from(author)),
        (ATTR_TITLE, AttrValue::from(title)),
    ]);
    node
}

/// Replace the range with a citation node referencing external content
pub fn commit_citation(start: Position, end: Position, ref_id: impl Into<String>) -> Command {
    Command::single(
        "Insert Citation",
        Operation::ReplaceRange {
            start,
            end,
            content: Replacement::Block {
                node: citation(ref_id.into()),
                children: Vec::new(),
            },
        },
    )
}

fn quote_command(
    name: &'static str,
    start: Position,
    end: Position,
    quote: String,
    author: String,
    title: String,
) -> Command {
    Command::single(
        name,
        Operation::ReplaceRange {
            start,
            end,
            content: Replacement::Block {
                node: attributed_blockquote(&author, &title),
                children: vec![InlinePiece::Text {
                    text: quote,
                    marks: Vec::new(),
                }],
            },
        },
    )
}

/// Replace the range with an attributed quote blockquote
pub fn commit_quote(
    start: Position,
    end: Position,
    quote: impl Into<String>,
    author: impl Into<String>,
    title: impl Into<String>,
) -> Command {
    quote_command(
        "Insert Quote",
        start,
        end,
        quote.into(),
        author.into(),
        title.into(),
    )
}

/// Capture an existing passage into an attributed blockquote
pub fn capture_quote(
    start: Position,
    end: Position,
    quote: impl Into<String>,
    author: impl Into<String>,
    title: impl Into<String>,
) -> Command {
    quote_command(
        "Capture Quote",
        start,
        end,
        quote.into(),
        author.into(),
        title.into(),
    )
}

fn marked_text(label: String, mark_type: MarkType, attributes: Attributes) -> Vec<InlinePiece> {
    vec![InlinePiece::Text {
        text: label,
        marks: vec![Mark::with_attributes(mark_type, attributes)],
    }]
}

/// Replace the range with a mention of a discoverable user
pub fn commit_mention(
    start: Position,
    end: Position,
    user_id: impl Into<String>,
    label: impl Into<String>,
) -> Command {
    let label = label.into();
    Command::single(
        "Insert Mention",
        Operation::ReplaceRange {
            start,
            end,
            content: Replacement::Inline(marked_text(
                format!("@{label}"),
                MarkType::Mention,
                attrs([
                    ("id", AttrValue::Str(user_id.into())),
                    ("label", AttrValue::Str(label)),
                ]),
            )),
        },
    )
}

/// Replace the range with a topic tag
pub fn commit_tag(start: Position, end: Position, label: impl Into<String>) -> Command {
    let label = label.into();
    Command::single(
        "Insert Tag",
        Operation::ReplaceRange {
            start,
            end,
            content: Replacement::Inline(marked_text(
                format!("#{label}"),
                MarkType::Tag,
                attrs([("label", AttrValue::Str(label))]),
            )),
        },
    )
}

/// Replace the range with a meta tag
pub fn commit_meta_tag(start: Position, end: Position, label: impl Into<String>) -> Command {
    let label = label.into();
    Command::single(
        "Insert Meta Tag",
        Operation::ReplaceRange {
            start,
            end,
            content: Replacement::Inline(marked_text(
                format!("*{label}"),
                MarkType::MetaTag,
                attrs([("label", AttrValue::Str(label))]),
            )),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorEngine;
    use doc_model::elements::ref_id;
    use doc_model::{DocumentTree, NodeId, NodeType};

    fn engine_with_text(text: &str) -> (EditorEngine, NodeId) {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text(text), para_id, None).unwrap();
        (EditorEngine::with_tree(tree), para_id)
    }

    #[test]
    fn test_commit_citation_replaces_trigger_text() {
        let (mut engine, para_id) = engine_with_text("see [[gita 2");
        engine
            .execute(commit_citation(
                Position::new(para_id, 4),
                Position::new(para_id, 12),
                "gita-2-47",
            ))
            .unwrap();

        assert_eq!(engine.tree().block_text(para_id), "see ");
        let blocks = engine.tree().document.children();
        assert_eq!(blocks.len(), 2);
        let inserted = engine.tree().get(blocks[1]).unwrap();
        assert_eq!(inserted.node_type, NodeType::Citation);
        assert_eq!(ref_id(inserted).unwrap().as_str(), "gita-2-47");
    }

    #[test]
    fn test_commit_quote_builds_attributed_blockquote() {
        let (mut engine, para_id) = engine_with_text("\"stead");
        engine
            .execute(commit_quote(
                Position::new(para_id, 0),
                Position::new(para_id, 6),
                "Steadiness and ease together define the posture.",
                "Patanjali",
                "Yoga Sutras",
            ))
            .unwrap();

        let blocks = engine.tree().document.children();
        let quote_block = engine.tree().get(blocks[1]).unwrap();
        assert_eq!(quote_block.node_type, NodeType::Blockquote);
        assert_eq!(quote_block.attr_str(ATTR_QUOTE_STYLE), Some("attributed"));
        assert_eq!(quote_block.attr_str(ATTR_AUTHOR), Some("Patanjali"));
        assert_eq!(
            engine.tree().block_text(blocks[1]),
            "Steadiness and ease together define the posture."
        );
    }

    #[test]
    fn test_commit_mention_marks_the_label() {
        let (mut engine, para_id) = engine_with_text("cc @ra");
        engine
            .execute(commit_mention(
                Position::new(para_id, 3),
                Position::new(para_id, 6),
                "user-81",
                "rama",
            ))
            .unwrap();

        assert_eq!(engine.tree().block_text(para_id), "cc @rama");
        let mentioned = engine
            .tree()
            .text_runs(para_id)
            .into_iter()
            .find(|r| Mark::set_contains(&r.marks, MarkType::Mention))
            .expect("mention run");
        assert_eq!(mentioned.text, "@rama");
    }
}
