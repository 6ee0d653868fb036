//! Tooltip widget lifecycle
//!
//! One hover widget per decorated span, zero elsewhere. Reconciliation is
//! destroy-all-then-recreate: span counts are small, so correctness beats
//! diffing. Widgets are created through a host-supplied factory owned by
//! one editor instance, so editors on the same page never share state.

use crate::{Decoration, DecorationSet};
use tracing::trace;

/// A live hover widget attached to one decorated span
pub trait TooltipWidget: Send {
    /// Release the widget's listeners and any host resources
    fn destroy(&mut self);
}

/// Host interface creating widgets for decorated spans
pub trait TooltipHost: Send + Sync {
    /// Create a widget for a decoration
    fn create(&self, decoration: &Decoration) -> Box<dyn TooltipWidget>;
}

/// Manages tooltip widgets for one editor instance
pub struct TooltipManager {
    host: Box<dyn TooltipHost>,
    widgets: Vec<Box<dyn TooltipWidget>>,
}

impl TooltipManager {
    /// Create a manager over a host factory
    pub fn new(host: Box<dyn TooltipHost>) -> Self {
        Self {
            host,
            widgets: Vec::new(),
        }
    }

    /// Number of live widgets
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Reconcile widgets against the current decoration set: destroy every
    /// existing widget, then instantiate one per decorated span.
    pub fn reconcile(&mut self, decorations: &DecorationSet) {
        self.teardown();
        for decoration in decorations.iter() {
            self.widgets.push(self.host.create(decoration));
        }
        trace!(count = self.widgets.len(), "tooltip widgets reconciled");
    }

    /// Destroy all live widgets. Must run on editor teardown; leaving
    /// widgets alive leaks listeners in the host.
    pub fn teardown(&mut self) {
        for widget in &mut self.widgets {
            widget.destroy();
        }
        self.widgets.clear();
    }
}

impl Drop for TooltipManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TooltipPayload;
    use doc_model::NodeId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingWidget {
        destroyed: Arc<AtomicUsize>,
        alive: bool,
    }

    impl TooltipWidget for CountingWidget {
        fn destroy(&mut self) {
            if self.alive {
                self.alive = false;
                self.destroyed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct CountingHost {
        created: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    }

    impl TooltipHost for CountingHost {
        fn create(&self, _decoration: &Decoration) -> Box<dyn TooltipWidget> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingWidget {
                destroyed: self.destroyed.clone(),
                alive: true,
            })
        }
    }

    fn set_of(n: usize) -> DecorationSet {
        let block = NodeId::new();
        let decorations = (0..n)
            .map(|i| Decoration {
                block,
                from: i * 10,
                to: i * 10 + 4,
                css_class: "glossary-term glossary-saffron".to_string(),
                tooltip: TooltipPayload {
                    term: "t".to_string(),
                    transliteration: "t".to_string(),
                    definition: "d".to_string(),
                },
            })
            .collect();
        DecorationSet::new(decorations, 1)
    }

    fn counting_manager() -> (TooltipManager, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let manager = TooltipManager::new(Box::new(CountingHost {
            created: created.clone(),
            destroyed: destroyed.clone(),
        }));
        (manager, created, destroyed)
    }

    #[test]
    fn test_one_widget_per_span() {
        let (mut manager, created, _) = counting_manager();
        manager.reconcile(&set_of(3));
        assert_eq!(manager.widget_count(), 3);
        assert_eq!(created.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_reconcile_destroys_previous_generation() {
        let (mut manager, created, destroyed) = counting_manager();
        manager.reconcile(&set_of(3));
        manager.reconcile(&set_of(2));

        assert_eq!(manager.widget_count(), 2);
        assert_eq!(created.load(Ordering::SeqCst), 5);
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_teardown_leaves_nothing_alive() {
        let (mut manager, created, destroyed) = counting_manager();
        manager.reconcile(&set_of(4));
        manager.teardown();
        assert_eq!(manager.widget_count(), 0);
        assert_eq!(destroyed.load(Ordering::SeqCst), created.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_destroys_widgets() {
        let (mut manager, _, destroyed) = counting_manager();
        manager.reconcile(&set_of(2));
        drop(manager);
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
    }
}
