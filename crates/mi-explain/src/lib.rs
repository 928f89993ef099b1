//! Explanation pipeline for the model inspection panel
//!
//! Builds per-row local-importance series for the current selection, ranks
//! features for the shared plot axis, and maintains the feature picker
//! state for the companion panel.

mod aggregate;
mod colors;
mod engine;
mod filter;
mod rank;
mod strings;

pub use aggregate::{aggregate_importances, ImportanceSeries};
pub use colors::series_color;
pub use engine::{ExplanationState, InspectionEngine};
pub use filter::{ApplyCallback, FeatureFilter};
pub use rank::{sort_indices, FeatureRanking};
pub use strings::{format_row_label, format_string, localized};
