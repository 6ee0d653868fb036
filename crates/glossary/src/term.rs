//! Glossary terms, color themes, and the stemming rule

use serde::{Deserialize, Serialize};

/// A dictionary entry supplied by the host application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// The term as it appears in the dictionary
    pub term: String,
    /// Romanized transliteration shown in the tooltip
    pub transliteration: String,
    /// Definition shown in the tooltip
    pub definition: String,
    /// Per-term theme override; None uses the engine theme
    #[serde(default)]
    pub color_theme: Option<ColorTheme>,
}

impl GlossaryTerm {
    /// Create a new term
    pub fn new(
        term: impl Into<String>,
        transliteration: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            transliteration: transliteration.into(),
            definition: definition.into(),
            color_theme: None,
        }
    }

    /// Set a per-term theme override
    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        self.color_theme = Some(theme);
        self
    }
}

/// Highlight color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorTheme {
    #[default]
    Saffron,
    Emerald,
    Sky,
    Rose,
}

impl ColorTheme {
    /// The CSS class emitted on decorated spans
    pub fn css_class(&self) -> &'static str {
        match self {
            ColorTheme::Saffron => "glossary-term glossary-saffron",
            ColorTheme::Emerald => "glossary-term glossary-emerald",
            ColorTheme::Sky => "glossary-term glossary-sky",
            ColorTheme::Rose => "glossary-term glossary-rose",
        }
    }
}

/// Stemming rule applied to dictionary terms before matching.
///
/// The rule strips a trailing character class. The default class covers the
/// visarga in both its Devanagari and romanized forms, matching the
/// dictionary data this engine was built for; hosts with other scripts
/// supply their own class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemRule {
    /// Characters stripped from the end of a term
    pub strip_trailing: Vec<char>,
}

impl Default for StemRule {
    fn default() -> Self {
        Self {
            strip_trailing: vec!['\u{0903}', '\u{1E25}'],
        }
    }
}

impl StemRule {
    /// Create a rule stripping the given trailing characters
    pub fn new(strip_trailing: Vec<char>) -> Self {
        Self { strip_trailing }
    }

    /// A rule that never strips anything
    pub fn none() -> Self {
        Self {
            strip_trailing: Vec::new(),
        }
    }

    /// Stem a term by stripping trailing characters in the class
    pub fn stem<'a>(&self, term: &'a str) -> &'a str {
        let mut stemmed = term;
        while let Some(last) = stemmed.chars().last() {
            if self.strip_trailing.contains(&last) {
                stemmed = &stemmed[..stemmed.len() - last.len_utf8()];
            } else {
                break;
            }
        }
        stemmed
    }
}
