//! The per-trigger suggestion state machine
//!
//! One controller exists per trigger instance and dies with it. Queries
//! carry a generation token; a response whose token is no longer current is
//! discarded instead of rendered, so out-of-order provider responses can
//! never show stale results.

use crate::{
    CancellationToken, CaretRect, Result, SuggestError, SuggestionItem, SuggestionPopup,
    SuggestionProvider, TriggerKind,
};
use doc_model::Position;
use edit_engine::{
    commit_citation, commit_mention, commit_meta_tag, commit_quote, commit_tag, Command,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Debounce applied before network-backed provider queries
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Lifecycle state of one trigger instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionState {
    /// Popup visible, results current
    Open,
    /// A query is outstanding
    Updating,
    /// An item was committed; the instance is finished
    Committed,
    /// The instance was torn down without committing
    Cancelled,
}

impl SuggestionState {
    /// Whether the instance has finished its cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, SuggestionState::Committed | SuggestionState::Cancelled)
    }
}

/// Token tying a provider response to the query that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
}

/// What a commit resolved to: the chosen item plus the range to replace
#[derive(Debug, Clone)]
pub struct CommitIntent {
    /// The committed item
    pub item: SuggestionItem,
    /// Start of the trigger range (the trigger character)
    pub start: Position,
    /// End of the trigger range (the caret after the query text)
    pub end: Position,
    /// The trigger kind that owned the cycle
    pub kind: TriggerKind,
}

impl CommitIntent {
    /// Build the structured replacement command for this commit
    pub fn into_command(self) -> Result<Command> {
        match (self.kind, self.item) {
            (TriggerKind::Citation, SuggestionItem::Citation { ref_id, .. }) => {
                Ok(commit_citation(self.start, self.end, ref_id))
            }
            (
                TriggerKind::Quote,
                SuggestionItem::Quote {
                    quote,
                    author,
                    title,
                },
            ) => Ok(commit_quote(self.start, self.end, quote, author, title)),
            (TriggerKind::Mention, SuggestionItem::User { id, label, .. }) => {
                Ok(commit_mention(self.start, self.end, id, label))
            }
            (TriggerKind::Tag, SuggestionItem::Tag { label }) => {
                Ok(commit_tag(self.start, self.end, label))
            }
            (TriggerKind::MetaTag, SuggestionItem::Tag { label }) => {
                Ok(commit_meta_tag(self.start, self.end, label))
            }
            _ => Err(SuggestError::ItemMismatch),
        }
    }
}

/// State machine for one trigger-to-commit cycle
pub struct SuggestionController {
    kind: TriggerKind,
    provider: Arc<dyn SuggestionProvider>,
    state: SuggestionState,
    query: String,
    generation: u64,
    popup: SuggestionPopup,
    token: CancellationToken,
    trigger_start: Position,
}

impl SuggestionController {
    /// Open a new instance at a trigger position.
    ///
    /// `trigger_start` addresses the first character of the trigger text;
    /// `anchor` is the caret rectangle captured at open time.
    pub fn open(
        kind: TriggerKind,
        provider: Arc<dyn SuggestionProvider>,
        trigger_start: Position,
        anchor: CaretRect,
    ) -> Self {
        debug!(?kind, "suggestion popup opened");
        Self {
            kind,
            provider,
            state: SuggestionState::Open,
            query: String::new(),
            generation: 0,
            popup: SuggestionPopup::new(anchor),
            token: CancellationToken::new(),
            trigger_start,
        }
    }

    /// The trigger kind owning this instance
    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// Current lifecycle state
    pub fn state(&self) -> SuggestionState {
        self.state
    }

    /// The current query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The popup list
    pub fn popup(&self) -> &SuggestionPopup {
        &self.popup
    }

    /// The cancellation token for this instance
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// The document range this instance owns: trigger text plus query
    pub fn replace_range(&self) -> (Position, Position) {
        let end_offset = self.trigger_start.offset
            + self.kind.trigger_len()
            + self.query.graphemes(true).count();
        (
            self.trigger_start,
            Position::new(self.trigger_start.node_id, end_offset),
        )
    }

    /// Record a new query, superseding any outstanding one.
    ///
    /// Returns the ticket a response must present to be applied.
    pub fn begin_update(&mut self, query: &str, anchor: CaretRect) -> QueryTicket {
        self.generation += 1;
        self.query = query.to_string();
        self.popup.set_anchor(anchor);
        if !self.state.is_terminal() {
            self.state = SuggestionState::Updating;
        }
        QueryTicket {
            generation: self.generation,
        }
    }

    /// Apply a provider response if its ticket is still current.
    ///
    /// A response for a superseded query, or one arriving after commit or
    /// cancel, is discarded; the popup only ever renders the most recently
    /// issued query's results.
    pub fn apply_results(&mut self, ticket: QueryTicket, items: Vec<SuggestionItem>) -> bool {
        if self.state.is_terminal()
            || self.token.is_cancelled()
            || ticket.generation != self.generation
        {
            trace!(
                ticket = ticket.generation,
                current = self.generation,
                "stale suggestion response discarded"
            );
            return false;
        }
        self.popup.set_items(items);
        self.state = SuggestionState::Open;
        true
    }

    /// Issue a query end-to-end: debounce (network-backed kinds only),
    /// call the provider, and apply the response if still current.
    ///
    /// A provider failure degrades to an empty list; it never surfaces as
    /// a fault.
    pub async fn run_query(&mut self, query: &str, anchor: CaretRect) -> bool {
        let ticket = self.begin_update(query, anchor);

        if self.kind.needs_debounce() {
            sleep(SUGGESTION_DEBOUNCE).await;
            if self.token.is_cancelled() || ticket.generation != self.generation {
                return false;
            }
        }

        let provider = self.provider.clone();
        let items = match provider.items(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "suggestion provider failed");
                Vec::new()
            }
        };
        self.apply_results(ticket, items)
    }

    /// Move the popup highlight up (wraps)
    pub fn key_up(&mut self) {
        self.popup.move_up();
    }

    /// Move the popup highlight down (wraps)
    pub fn key_down(&mut self) {
        self.popup.move_down();
    }

    /// Commit the highlighted item, finishing the cycle.
    ///
    /// Returns None when nothing is highlighted (the popup stays open).
    pub fn commit(&mut self) -> Option<CommitIntent> {
        if self.state.is_terminal() {
            return None;
        }
        let item = self.popup.highlighted_item()?.clone();
        let (start, end) = self.replace_range();
        self.state = SuggestionState::Committed;
        self.token.cancel();
        self.popup.set_items(Vec::new());
        debug!(label = %item.display_label(), "suggestion committed");
        Some(CommitIntent {
            item,
            start,
            end,
            kind: self.kind,
        })
    }

    /// Tear the instance down without mutating the document.
    ///
    /// Used for Escape, trigger deletion, and the caret leaving the active
    /// range. In-flight work is cancelled; the popup never survives.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = SuggestionState::Cancelled;
        self.token.cancel();
        self.popup.set_items(Vec::new());
        debug!("suggestion popup cancelled");
    }

    /// Check that the caret is still inside the active range; cancel and
    /// report false when the context is lost.
    pub fn retain_context(&mut self, caret: Position) -> bool {
        let (start, end) = self.replace_range();
        let inside = caret.node_id == start.node_id
            && caret.offset >= start.offset + self.kind.trigger_len()
            && caret.offset <= end.offset;
        if !inside {
            self.cancel();
        }
        inside
    }
}
