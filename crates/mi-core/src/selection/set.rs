//! Selection set engine

use super::{SelectionContext, SelectionSubscriber};
use crate::data::RowId;
use indexmap::IndexSet;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Selection state stored internally
#[derive(Debug, Clone)]
struct SelectionState {
    eligible: Vec<RowId>,
    selected: IndexSet<RowId>,
}

/// Order-preserving set of selected rows, reconciled against an externally
/// supplied eligibility list
///
/// Construction is two-phase: `initialize` builds the complete initial
/// state before any subscriber can exist, so the initial programmatic
/// selection never re-enters the update path. After that, selection changes
/// originate only from grid interaction.
pub struct SelectionSet {
    state: Arc<RwLock<SelectionState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn SelectionSubscriber>>>>,
}

impl SelectionSet {
    /// Build the initial state: select exactly the eligible rows that are
    /// currently rendered, matched by identifier. Eligible identifiers with
    /// no rendered row are dropped silently.
    pub fn initialize(eligible: Vec<RowId>, rendered: &[RowId]) -> Self {
        let selected: IndexSet<RowId> = eligible
            .iter()
            .copied()
            .filter(|id| rendered.contains(id))
            .collect();

        debug!(
            eligible = eligible.len(),
            selected = selected.len(),
            "selection set initialized"
        );

        Self {
            state: Arc::new(RwLock::new(SelectionState { eligible, selected })),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Select or deselect a row from grid interaction
    ///
    /// Selecting an identifier outside the eligibility list is refused
    /// silently; selection never outruns eligibility.
    pub fn set_selected(&self, id: RowId, selected: bool) {
        let changed = {
            let mut state = self.state.write();
            if selected {
                if state.eligible.contains(&id) {
                    state.selected.insert(id)
                } else {
                    debug!(id, "ignoring selection outside the eligibility list");
                    false
                }
            } else {
                state.selected.shift_remove(&id)
            }
        };

        if changed {
            self.notify_subscribers();
        }
    }

    /// Toggle a row's selection
    pub fn toggle(&self, id: RowId) {
        let currently = self.state.read().selected.contains(&id);
        self.set_selected(id, !currently);
    }

    /// Deselect every row
    pub fn clear(&self) {
        let changed = {
            let mut state = self.state.write();
            let had_selection = !state.selected.is_empty();
            state.selected.clear();
            had_selection
        };

        if changed {
            self.notify_subscribers();
        }
    }

    /// Replace the eligibility list without altering which rows are
    /// selected
    ///
    /// Downstream aggregation intersects the new list with the current
    /// selection, so previously selected rows that dropped out of
    /// eligibility simply disappear from the output.
    pub fn sync_eligibility(&self, eligible: Vec<RowId>) {
        {
            let mut state = self.state.write();
            debug!(
                previous = state.eligible.len(),
                current = eligible.len(),
                "eligibility list replaced"
            );
            state.eligible = eligible;
        }
        self.notify_subscribers();
    }

    /// Whether a row is currently selected
    pub fn is_selected(&self, id: RowId) -> bool {
        self.state.read().selected.contains(&id)
    }

    /// Current snapshot; selected identifiers come out in eligibility
    /// order, not selection order
    pub fn context(&self) -> SelectionContext {
        let state = self.state.read();
        let selected = state
            .eligible
            .iter()
            .copied()
            .filter(|id| state.selected.contains(id))
            .collect();
        SelectionContext {
            eligible: state.eligible.clone(),
            selected,
        }
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn SelectionSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of a selection change
    fn notify_subscribers(&self) {
        let context = self.context();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_selection_change(&context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        contexts: Mutex<Vec<SelectionContext>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                contexts: Mutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.contexts.lock().len()
        }

        fn last_selected(&self) -> Vec<RowId> {
            self.contexts.lock().last().map(|c| c.selected.clone()).unwrap_or_default()
        }
    }

    impl SelectionSubscriber for Recorder {
        fn on_selection_change(&self, context: &SelectionContext) {
            self.contexts.lock().push(context.clone());
        }
    }

    #[test]
    fn test_initial_selection_is_intersection() {
        let set = SelectionSet::initialize(vec![7, 3, 9, 1], &[1, 2, 3, 4]);
        let context = set.context();
        assert_eq!(context.selected, vec![3, 1]);
        assert_eq!(context.eligible, vec![7, 3, 9, 1]);
    }

    #[test]
    fn test_initialization_emits_no_notifications() {
        let set = SelectionSet::initialize(vec![0, 1], &[0, 1]);
        let recorder = Recorder::new();
        set.add_subscriber(recorder.clone());
        assert_eq!(recorder.count(), 0);

        set.set_selected(0, false);
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn test_selection_outside_eligibility_is_refused() {
        let set = SelectionSet::initialize(vec![1, 2], &[1, 2]);
        let recorder = Recorder::new();
        set.add_subscriber(recorder.clone());

        set.set_selected(42, true);
        assert!(!set.is_selected(42));
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_context_orders_by_eligibility() {
        let set = SelectionSet::initialize(vec![5, 2, 8], &[]);
        // Select in reverse eligibility order
        set.set_selected(8, true);
        set.set_selected(5, true);
        assert_eq!(set.context().selected, vec![5, 8]);
    }

    #[test]
    fn test_toggle_and_clear_notify() {
        let set = SelectionSet::initialize(vec![1, 2, 3], &[1, 2, 3]);
        let recorder = Recorder::new();
        set.add_subscriber(recorder.clone());

        set.toggle(2);
        assert_eq!(recorder.last_selected(), vec![1, 3]);

        set.clear();
        assert!(recorder.last_selected().is_empty());
        assert_eq!(recorder.count(), 2);
    }

    #[test]
    fn test_redundant_change_does_not_notify() {
        let set = SelectionSet::initialize(vec![1], &[1]);
        let recorder = Recorder::new();
        set.add_subscriber(recorder.clone());

        set.set_selected(1, true);
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_sync_eligibility_keeps_selection() {
        let set = SelectionSet::initialize(vec![1, 2, 3], &[1, 2, 3]);
        let recorder = Recorder::new();
        set.add_subscriber(recorder.clone());

        set.sync_eligibility(vec![2, 3, 4]);
        assert_eq!(recorder.count(), 1);
        // 1 fell out of eligibility, 2 and 3 are still selected
        assert_eq!(recorder.last_selected(), vec![2, 3]);
        assert!(set.is_selected(2));
        assert!(set.is_selected(3));
    }
}
