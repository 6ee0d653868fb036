//! Popup list state and keyboard navigation

use crate::SuggestionItem;
use serde::{Deserialize, Serialize};

/// Screen rectangle of the caret, used to anchor the popup
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaretRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CaretRect {
    /// Create a caret rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The keyboard-navigable suggestion list
///
/// The popup anchors to the caret rectangle captured at open time and is
/// re-anchored on every update, since the caret moves as the query text
/// changes length.
#[derive(Debug, Clone, Default)]
pub struct SuggestionPopup {
    items: Vec<SuggestionItem>,
    highlighted: usize,
    anchor: CaretRect,
}

impl SuggestionPopup {
    /// Create an empty popup anchored at the caret
    pub fn new(anchor: CaretRect) -> Self {
        Self {
            items: Vec::new(),
            highlighted: 0,
            anchor,
        }
    }

    /// Replace the item list, resetting the highlight to the first entry
    pub fn set_items(&mut self, items: Vec<SuggestionItem>) {
        self.items = items;
        self.highlighted = 0;
    }

    /// The current items
    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The highlighted index
    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    /// The highlighted item, if any
    pub fn highlighted_item(&self) -> Option<&SuggestionItem> {
        self.items.get(self.highlighted)
    }

    /// Move the highlight up, wrapping at the top
    pub fn move_up(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.highlighted = (self.highlighted + n - 1) % n;
        }
    }

    /// Move the highlight down, wrapping at the bottom
    pub fn move_down(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.highlighted = (self.highlighted + 1) % n;
        }
    }

    /// The anchor rectangle
    pub fn anchor(&self) -> CaretRect {
        self.anchor
    }

    /// Re-anchor to a new caret rectangle
    pub fn set_anchor(&mut self, anchor: CaretRect) {
        self.anchor = anchor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popup_with(n: usize) -> SuggestionPopup {
        let mut popup = SuggestionPopup::new(CaretRect::default());
        popup.set_items(
            (0..n)
                .map(|i| SuggestionItem::Tag {
                    label: format!("tag-{i}"),
                })
                .collect(),
        );
        popup
    }

    #[test]
    fn test_down_wraps_to_top() {
        let mut popup = popup_with(3);
        popup.move_down();
        popup.move_down();
        assert_eq!(popup.highlighted_index(), 2);
        popup.move_down();
        assert_eq!(popup.highlighted_index(), 0);
    }

    #[test]
    fn test_up_wraps_to_bottom() {
        let mut popup = popup_with(3);
        popup.move_up();
        assert_eq!(popup.highlighted_index(), 2);
    }

    #[test]
    fn test_navigation_on_empty_list_is_safe() {
        let mut popup = popup_with(0);
        popup.move_up();
        popup.move_down();
        assert_eq!(popup.highlighted_index(), 0);
        assert!(popup.highlighted_item().is_none());
    }

    #[test]
    fn test_set_items_resets_highlight() {
        let mut popup = popup_with(3);
        popup.move_down();
        popup.set_items(vec![SuggestionItem::Tag {
            label: "fresh".to_string(),
        }]);
        assert_eq!(popup.highlighted_index(), 0);
    }
}
