//! Decoration computation over the document tree

use crate::{
    ColorTheme, CompiledDictionary, Decoration, DecorationSet, GlossaryTerm, Result, StemRule,
    TooltipPayload,
};
use doc_model::{ChangeSummary, DocumentTree, MarkType, NodeId, NodeType};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Placeholder filling excluded runs so offsets stay aligned while the
/// pattern cannot match across them
const MASK: char = '\u{FFFC}';

/// The glossary decoration engine
///
/// Owns the compiled pattern cache and the current decoration set. The
/// pattern compiles once per (dictionary, theme) pair; changing either
/// invalidates it. Decorations recompute on text changes and remap through
/// the edit otherwise.
pub struct GlossaryEngine {
    dictionary: Vec<GlossaryTerm>,
    rule: StemRule,
    theme: ColorTheme,
    excluded_marks: Vec<MarkType>,
    compiled: Option<CompiledDictionary>,
    decorations: DecorationSet,
}

impl GlossaryEngine {
    /// Create an engine with the default stemming rule and theme
    pub fn new() -> Self {
        Self::with_config(StemRule::default(), ColorTheme::default())
    }

    /// Create an engine with an explicit stemming rule and theme
    pub fn with_config(rule: StemRule, theme: ColorTheme) -> Self {
        Self {
            dictionary: Vec::new(),
            rule,
            theme,
            excluded_marks: vec![
                MarkType::Link,
                MarkType::Mention,
                MarkType::Tag,
                MarkType::MetaTag,
            ],
            compiled: None,
            decorations: DecorationSet::default(),
        }
    }

    /// Replace the dictionary, invalidating the compiled pattern
    pub fn set_dictionary(&mut self, dictionary: Vec<GlossaryTerm>) {
        self.dictionary = dictionary;
        self.compiled = None;
    }

    /// Change the theme, invalidating the compiled pattern
    pub fn set_theme(&mut self, theme: ColorTheme) {
        if self.theme != theme {
            self.theme = theme;
            self.compiled = None;
        }
    }

    /// Replace the set of mark types whose runs are never decorated
    pub fn set_excluded_marks(&mut self, marks: Vec<MarkType>) {
        self.excluded_marks = marks;
    }

    /// The current decoration overlay
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Refresh the overlay after a committed change: recompute when text
    /// changed, remap positions otherwise.
    pub fn refresh(
        &mut self,
        tree: &DocumentTree,
        summary: &ChangeSummary,
    ) -> Result<&DecorationSet> {
        if summary.text_changed {
            self.recompute(tree)
        } else {
            self.decorations = self
                .decorations
                .remap(summary, tree.document.version());
            Ok(&self.decorations)
        }
    }

    /// Recompute the full overlay from the latest committed document version
    pub fn recompute(&mut self, tree: &DocumentTree) -> Result<&DecorationSet> {
        if self.compiled.is_none() {
            self.compiled = Some(CompiledDictionary::compile(
                &self.dictionary,
                &self.rule,
                self.theme,
            )?);
        }

        let mut decorations = Vec::new();
        if let Some(compiled) = &self.compiled {
            for &block in tree.document.children() {
                // Citation content renders from external data; nothing inside
                // a citation (or any other atomic block) is ours to decorate.
                if tree
                    .get(block)
                    .map(|n| n.node_type == NodeType::Citation || n.node_type.is_atomic())
                    .unwrap_or(true)
                {
                    continue;
                }
                collect_block(
                    tree,
                    block,
                    compiled,
                    &self.excluded_marks,
                    self.theme,
                    &mut decorations,
                );
            }
        }

        debug!(
            count = decorations.len(),
            version = tree.document.version(),
            "recomputed glossary decorations"
        );
        self.decorations = DecorationSet::new(decorations, tree.document.version());
        Ok(&self.decorations)
    }
}

impl Default for GlossaryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_block(
    tree: &DocumentTree,
    block: NodeId,
    compiled: &CompiledDictionary,
    excluded: &[MarkType],
    theme: ColorTheme,
    out: &mut Vec<Decoration>,
) {
    // Build the block's text with excluded runs masked one placeholder per
    // grapheme, so match offsets remain block offsets.
    let mut text = String::new();
    for run in tree.text_runs(block) {
        let is_excluded = run
            .marks
            .iter()
            .any(|m| excluded.contains(&m.mark_type));
        if is_excluded {
            for _ in run.text.graphemes(true) {
                text.push(MASK);
            }
        } else {
            text.push_str(&run.text);
        }
    }

    for found in compiled.find_matches(&text) {
        let entry = &compiled.entries()[found.entry];
        let css_class = entry
            .term
            .color_theme
            .unwrap_or(theme)
            .css_class()
            .to_string();
        out.push(Decoration {
            block,
            from: found.start,
            to: found.end,
            css_class,
            tooltip: TooltipPayload {
                term: entry.term.term.clone(),
                transliteration: entry.term.transliteration.clone(),
                definition: entry.term.definition.clone(),
            },
        });
    }
}
