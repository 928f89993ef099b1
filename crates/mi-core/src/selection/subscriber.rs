//! Selection subscriber trait

use super::SelectionContext;

/// Trait for components that need to respond to selection changes
pub trait SelectionSubscriber: Send + Sync {
    /// Called when the selected rows or the eligibility list change
    fn on_selection_change(&self, context: &SelectionContext);
}
