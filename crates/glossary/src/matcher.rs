//! Compiled term matching
//!
//! The dictionary compiles to a single alternation pattern: terms are
//! stemmed, deduplicated (first occurrence wins), sorted by descending
//! length so a longer term is never pre-empted by a shorter prefix of
//! itself, escaped, and joined. Compilation happens once per
//! (dictionary, theme) pair, not once per text node.

use crate::{ColorTheme, GlossaryError, GlossaryTerm, Result, StemRule};
use regex_lite::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// One dictionary entry after stemming
#[derive(Debug, Clone)]
pub struct CompiledTerm {
    /// The stemmed form used for matching
    pub stem: String,
    /// The original entry (tooltip payload source)
    pub term: GlossaryTerm,
}

/// A match of one compiled term in a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermMatch {
    /// Grapheme offset of the match start
    pub start: usize,
    /// Grapheme offset one past the match end
    pub end: usize,
    /// Index into the compiled entries
    pub entry: usize,
}

/// A dictionary compiled to one alternation pattern
#[derive(Debug)]
pub struct CompiledDictionary {
    entries: Vec<CompiledTerm>,
    pattern: Option<Regex>,
    theme: ColorTheme,
}

/// Characters with meaning inside a pattern; everything else is literal
const META_CHARACTERS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

/// Escape a stem for literal use inside the alternation pattern
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if META_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl CompiledDictionary {
    /// Compile a dictionary under a stemming rule and theme
    pub fn compile(
        dictionary: &[GlossaryTerm],
        rule: &StemRule,
        theme: ColorTheme,
    ) -> Result<Self> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<CompiledTerm> = Vec::new();

        for term in dictionary {
            let stem = rule.stem(&term.term);
            // Zero-length stems never reach the pattern
            if stem.is_empty() {
                continue;
            }
            // First occurrence wins when two raw terms stem identically
            if !seen.insert(stem.to_string()) {
                continue;
            }
            entries.push(CompiledTerm {
                stem: stem.to_string(),
                term: term.clone(),
            });
        }

        // Longest-match-first: a stable sort keeps first-wins order among
        // equal lengths.
        entries.sort_by(|a, b| b.stem.chars().count().cmp(&a.stem.chars().count()));

        let pattern = if entries.is_empty() {
            None
        } else {
            let alternation = entries
                .iter()
                .map(|e| escape_literal(&e.stem))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).map_err(|e| GlossaryError::Pattern(e.to_string()))?)
        };

        Ok(Self {
            entries,
            pattern,
            theme,
        })
    }

    /// The theme this dictionary was compiled for
    pub fn theme(&self) -> ColorTheme {
        self.theme
    }

    /// The compiled entries, in alternation order
    pub fn entries(&self) -> &[CompiledTerm] {
        &self.entries
    }

    /// Number of compiled entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary compiled to nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find all non-overlapping matches in a piece of text.
    ///
    /// Offsets are grapheme offsets into `text`.
    pub fn find_matches(&self, text: &str) -> Vec<TermMatch> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        for found in pattern.find_iter(text) {
            let matched = found.as_str();
            let Some(entry) = self.entries.iter().position(|e| e.stem == matched) else {
                continue;
            };
            let start = text[..found.start()].graphemes(true).count();
            let len = matched.graphemes(true).count();
            matches.push(TermMatch {
                start,
                end: start + len,
                entry,
            });
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(terms: &[&str]) -> Vec<GlossaryTerm> {
        terms
            .iter()
            .map(|t| GlossaryTerm::new(*t, format!("{t}-tr"), format!("{t}-def")))
            .collect()
    }

    #[test]
    fn test_longest_match_wins_over_prefix() {
        let compiled = CompiledDictionary::compile(
            &dict(&["yoga", "yogin"]),
            &StemRule::default(),
            ColorTheme::default(),
        )
        .unwrap();

        let matches = compiled.find_matches("yogin");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 5);
        assert_eq!(compiled.entries()[matches[0].entry].stem, "yogin");
    }

    #[test]
    fn test_duplicate_stems_first_wins() {
        let mut terms = dict(&["yoga\u{1E25}"]);
        terms.push(GlossaryTerm::new("yoga", "other-tr", "other-def"));
        let compiled =
            CompiledDictionary::compile(&terms, &StemRule::default(), ColorTheme::default())
                .unwrap();

        assert_eq!(compiled.len(), 1);
        // The first raw term's payload survives
        assert_eq!(compiled.entries()[0].term.transliteration, "yoga\u{1E25}-tr");
    }

    #[test]
    fn test_zero_length_terms_dropped() {
        let mut terms = dict(&["dharma"]);
        terms.push(GlossaryTerm::new("", "", ""));
        terms.push(GlossaryTerm::new("\u{1E25}", "", ""));
        let compiled =
            CompiledDictionary::compile(&terms, &StemRule::default(), ColorTheme::default())
                .unwrap();
        assert_eq!(compiled.len(), 1);
    }

    #[test]
    fn test_empty_dictionary_matches_nothing() {
        let compiled =
            CompiledDictionary::compile(&[], &StemRule::default(), ColorTheme::default()).unwrap();
        assert!(compiled.is_empty());
        assert!(compiled.find_matches("any text at all").is_empty());
    }

    #[test]
    fn test_regex_metacharacters_match_literally() {
        let compiled = CompiledDictionary::compile(
            &dict(&["om (aum)"]),
            &StemRule::default(),
            ColorTheme::default(),
        )
        .unwrap();
        let matches = compiled.find_matches("chant om (aum) daily");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 6);
    }

    #[test]
    fn test_stemmed_term_matches_inflected_text_prefix() {
        let compiled = CompiledDictionary::compile(
            &dict(&["karma\u{1E25}"]),
            &StemRule::default(),
            ColorTheme::default(),
        )
        .unwrap();
        let matches = compiled.find_matches("the law of karma binds");
        assert_eq!(matches.len(), 1);
        assert_eq!(compiled.entries()[matches[0].entry].stem, "karma");
    }
}
