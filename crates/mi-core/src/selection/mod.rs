use serde::{Deserialize, Serialize};

mod set;
mod subscriber;

pub use set::SelectionSet;
pub use subscriber::SelectionSubscriber;

use crate::data::RowId;

/// Immutable snapshot passed to subscribers on selection changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Eligibility list, in externally supplied order
    pub eligible: Vec<RowId>,
    /// Selected identifiers, in eligibility order
    pub selected: Vec<RowId>,
}

impl SelectionContext {
    /// True when no eligible row is selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
