//! Table-of-contents derivation

use crate::ATTR_HEADING_ID;
use doc_model::elements::{anchor_id, AnchorId};
use doc_model::{DocumentTree, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// One entry in the derived table of contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    /// The heading block
    pub heading: NodeId,
    /// Heading level (1..=6)
    pub level: u8,
    /// Heading text
    pub text: String,
    /// The stable heading id, if the stabilizer has assigned one
    pub id: Option<String>,
}

/// An anchored span created with a TOC anchor mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchoredSpan {
    /// The block containing the span
    pub block: NodeId,
    /// The anchor id
    pub anchor: AnchorId,
    /// The anchored text
    pub text: String,
}

/// Collect the table of contents: every heading in document order
pub fn collect_toc(tree: &DocumentTree) -> Vec<TocEntry> {
    tree.document
        .children()
        .iter()
        .filter_map(|&block| {
            let node = tree.get(block)?;
            if node.node_type != NodeType::Heading {
                return None;
            }
            Some(TocEntry {
                heading: block,
                level: node.heading_level().unwrap_or(1),
                text: tree.block_text(block),
                id: node.attr_str(ATTR_HEADING_ID).map(str::to_string),
            })
        })
        .collect()
}

/// Collect every anchored span in document order.
///
/// Adjacent runs sharing one anchor id merge into a single span.
pub fn collect_anchors(tree: &DocumentTree) -> Vec<AnchoredSpan> {
    let mut spans: Vec<AnchoredSpan> = Vec::new();

    for &block in tree.document.children() {
        for run in tree.text_runs(block) {
            let Some(anchor) = run.marks.iter().find_map(anchor_id) else {
                continue;
            };
            match spans.last_mut() {
                Some(last) if last.block == block && last.anchor == anchor => {
                    last.text.push_str(&run.text);
                }
                _ => spans.push(AnchoredSpan {
                    block,
                    anchor,
                    text: run.text.clone(),
                }),
            }
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stabilize_headings;
    use doc_model::elements::toc_anchor_mark;
    use doc_model::{Mark, Node};
    use edit_engine::EditorEngine;

    #[test]
    fn test_collect_toc_in_document_order() {
        let mut tree = DocumentTree::new();
        for (level, text) in [(1u8, "Samadhi Pada"), (2, "On Stilling"), (1, "Sadhana Pada")] {
            let h = Node::heading(level);
            let h_id = h.id();
            tree.insert_node(h, tree.root_id(), None).unwrap();
            tree.insert_node(Node::text(text), h_id, None).unwrap();
        }
        let mut engine = EditorEngine::with_tree(tree);
        engine
            .execute(stabilize_headings(engine.tree()).unwrap())
            .unwrap();

        let toc = collect_toc(engine.tree());
        assert_eq!(toc.len(), 3);
        assert_eq!(toc[0].text, "Samadhi Pada");
        assert_eq!(toc[0].id.as_deref(), Some("samadhi-pada"));
        assert_eq!(toc[1].level, 2);
    }

    #[test]
    fn test_anchored_spans_merge_adjacent_runs() {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text("the still mind rests"), para_id, None)
            .unwrap();

        let id = doc_model::elements::AnchorId::new("toc-still");
        tree.add_mark_in_block(para_id, 4, 14, toc_anchor_mark(&id))
            .unwrap();
        // Splitting the anchored region leaves two runs with the same anchor
        tree.split_run_at(para_id, 9).unwrap();

        let spans = collect_anchors(&tree);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "still mind");
        assert_eq!(spans[0].anchor, id);
    }

    #[test]
    fn test_plain_marks_produce_no_anchors() {
        let mut tree = DocumentTree::new();
        let para = Node::paragraph();
        let para_id = para.id();
        tree.insert_node(para, tree.root_id(), None).unwrap();
        tree.insert_node(Node::text("bold words"), para_id, None)
            .unwrap();
        tree.add_mark_in_block(para_id, 0, 4, Mark::new(doc_model::MarkType::Bold))
            .unwrap();

        assert!(collect_anchors(&tree).is_empty());
    }
}
