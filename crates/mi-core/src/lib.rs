//! Core state management for the model inspection panel
//!
//! This crate provides the selection engine, event bus, and the data-facing
//! traits that the explanation pipeline builds on.

pub mod data;
pub mod events;
pub mod selection;
pub mod state;
pub mod weights;

// Re-export commonly used types
pub use data::{CohortRow, CohortStore, FeatureValue, ModelInvoker, RowId};
pub use selection::{SelectionContext, SelectionSet, SelectionSubscriber};
pub use state::{PanelSettings, PanelState};
pub use weights::WeightVector;
