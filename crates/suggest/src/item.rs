//! Suggestion items, polymorphic over the provider that produced them

use serde::{Deserialize, Serialize};

/// One entry in the suggestion popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SuggestionItem {
    /// A citation lookup result
    #[serde(rename_all = "camelCase")]
    Citation {
        ref_id: String,
        source: String,
        location: String,
        preview: String,
    },
    /// A quote lookup result
    Quote {
        quote: String,
        author: String,
        title: String,
    },
    /// A discoverable user, for mentions
    #[serde(rename_all = "camelCase")]
    User {
        id: String,
        label: String,
        avatar_url: Option<String>,
    },
    /// A tag or meta-tag label
    Tag { label: String },
}

impl SuggestionItem {
    /// The text shown in the popup row
    pub fn display_label(&self) -> String {
        match self {
            SuggestionItem::Citation {
                source, location, ..
            } => format!("{source} {location}"),
            SuggestionItem::Quote { author, title, .. } => format!("{author}, {title}"),
            SuggestionItem::User { label, .. } => label.clone(),
            SuggestionItem::Tag { label } => label.clone(),
        }
    }

    /// The text the popup filter matches against
    pub fn filter_key(&self) -> String {
        match self {
            SuggestionItem::Citation {
                ref_id,
                source,
                location,
                ..
            } => format!("{ref_id} {source} {location}"),
            SuggestionItem::Quote {
                quote,
                author,
                title,
            } => format!("{quote} {author} {title}"),
            SuggestionItem::User { label, .. } => label.clone(),
            SuggestionItem::Tag { label } => label.clone(),
        }
    }
}
