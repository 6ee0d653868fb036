//! Suggestion item providers

use crate::{Result, SuggestionItem};
use std::future::Future;
use std::pin::Pin;

/// Future returned by a provider query
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<SuggestionItem>>> + Send + 'a>>;

/// Async source of suggestion items
///
/// Implemented externally: citation search, quote search, user discovery.
/// Calls must be non-blocking; the popup stays responsive while a request
/// is outstanding, and the controller discards results that arrive for a
/// superseded query.
pub trait SuggestionProvider: Send + Sync {
    /// Fetch items matching a query
    fn items(&self, query: &str) -> ProviderFuture<'_>;
}

/// Provider over a static item list, filtered client-side by query.
///
/// Used for mention, tag, and meta-tag triggers, whose candidate sets are
/// fetched once and filtered locally per keystroke.
pub struct StaticListProvider {
    items: Vec<SuggestionItem>,
}

impl StaticListProvider {
    /// Create a provider over a fixed item list
    pub fn new(items: Vec<SuggestionItem>) -> Self {
        Self { items }
    }
}

impl SuggestionProvider for StaticListProvider {
    fn items(&self, query: &str) -> ProviderFuture<'_> {
        let needle = query.to_lowercase();
        Box::pin(async move {
            Ok(self
                .items
                .iter()
                .filter(|item| item.filter_key().to_lowercase().contains(&needle))
                .cloned()
                .collect())
        })
    }
}
