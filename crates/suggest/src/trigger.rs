//! Trigger characters and their context rules

use serde::{Deserialize, Serialize};

/// The provider family a trigger activates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// `[[` - citation lookup
    Citation,
    /// `"` - quote lookup
    Quote,
    /// `@` - user mention
    Mention,
    /// `#` - topic tag
    Tag,
    /// `*` - meta tag
    MetaTag,
}

impl TriggerKind {
    /// Number of characters the trigger itself occupies in the document
    pub fn trigger_len(&self) -> usize {
        match self {
            TriggerKind::Citation => 2,
            _ => 1,
        }
    }

    /// Whether queries for this kind hit the network and must be debounced
    pub fn needs_debounce(&self) -> bool {
        matches!(self, TriggerKind::Citation | TriggerKind::Quote)
    }
}

/// Decide whether typing `typed` after `before` (the block text preceding
/// the caret) fires a trigger.
///
/// The citation trigger is two characters: the first `[` types normally and
/// arms it, the second fires it. The quote trigger only fires after
/// whitespace or at the start of a block, so a quotation mark mid-word
/// never opens a popup.
pub fn detect_trigger(before: &str, typed: char) -> Option<TriggerKind> {
    match typed {
        '[' if before.ends_with('[') => Some(TriggerKind::Citation),
        '"' => {
            let allowed = match before.chars().last() {
                None => true,
                Some(c) => c.is_whitespace(),
            };
            allowed.then_some(TriggerKind::Quote)
        }
        '@' => Some(TriggerKind::Mention),
        '#' => Some(TriggerKind::Tag),
        '*' => Some(TriggerKind::MetaTag),
        _ => None,
    }
}
