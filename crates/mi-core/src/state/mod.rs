use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::data::CohortStore;
use crate::events::EventBus;
use crate::weights::WeightVector;

/// The shared panel state
pub struct PanelState {
    /// The event bus
    pub event_bus: Arc<EventBus>,

    /// The currently loaded cohort store
    pub cohort: Arc<RwLock<Option<Arc<dyn CohortStore>>>>,

    /// The active weight vector
    pub weight_vector: Arc<RwLock<WeightVector>>,

    /// Panel settings
    pub settings: Arc<RwLock<PanelSettings>>,
}

/// Panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Maximum number of rows rendered in the inspection grid
    pub max_viewed_rows: usize,

    /// Whether the grid shows row numbers
    pub show_row_numbers: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            max_viewed_rows: 8,
            show_row_numbers: true,
        }
    }
}

impl PanelState {
    /// Create a new panel state
    pub fn new() -> Self {
        Self {
            event_bus: Arc::new(EventBus::new()),
            cohort: Arc::new(RwLock::new(None)),
            weight_vector: Arc::new(RwLock::new(WeightVector::default())),
            settings: Arc::new(RwLock::new(PanelSettings::default())),
        }
    }

    /// Load a cohort store
    pub fn load_cohort(&self, store: Arc<dyn CohortStore>) {
        let source_name = store.source_name().to_string();
        let row_count = store.row_count();
        let feature_count = store.feature_names().len();

        info!(source = %source_name, rows = row_count, "cohort loaded");
        *self.cohort.write() = Some(store);

        self.event_bus.publish(crate::events::events::CohortLoaded {
            source_name,
            row_count,
            feature_count,
        });
    }

    /// Clear the current cohort
    pub fn clear_cohort(&self) {
        *self.cohort.write() = None;
    }

    /// Switch the active weight vector
    pub fn set_weight_vector(&self, weight: WeightVector) {
        *self.weight_vector.write() = weight;
        self.event_bus
            .publish(crate::events::events::WeightVectorChanged { weight });
    }

    /// Number of rows the grid should render for a cohort and eligibility
    /// list of the given sizes
    pub fn viewed_rows(&self, cohort_rows: usize, eligible_rows: usize) -> usize {
        let settings = self.settings.read();
        cohort_rows.min(settings.max_viewed_rows).min(eligible_rows)
    }

    /// Commit a feature subset chosen in the picker panel
    pub fn commit_feature_subset(&self, features: Vec<String>) {
        self.event_bus
            .publish(crate::events::events::FeatureSubsetApplied { features });
    }

    /// Save panel settings
    pub fn save_settings(&self) -> serde_json::Value {
        let settings = self.settings.read();
        serde_json::json!({
            "max_viewed_rows": settings.max_viewed_rows,
            "show_row_numbers": settings.show_row_numbers,
        })
    }

    /// Load panel settings
    pub fn load_settings(&self, config: serde_json::Value) {
        let mut settings = self.settings.write();
        if let Some(max_viewed_rows) = config.get("max_viewed_rows").and_then(|v| v.as_u64()) {
            settings.max_viewed_rows = max_viewed_rows as usize;
        }
        if let Some(show_row_numbers) = config.get("show_row_numbers").and_then(|v| v.as_bool()) {
            settings.show_row_numbers = show_row_numbers;
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewed_rows_cap() {
        let state = PanelState::new();
        assert_eq!(state.viewed_rows(100, 12), 8);
        assert_eq!(state.viewed_rows(100, 3), 3);
        assert_eq!(state.viewed_rows(2, 12), 2);
    }

    #[test]
    fn test_settings_round_trip() {
        let state = PanelState::new();
        state.load_settings(serde_json::json!({ "max_viewed_rows": 16 }));
        assert_eq!(state.settings.read().max_viewed_rows, 16);
        assert!(state.settings.read().show_row_numbers);

        let saved = state.save_settings();
        assert_eq!(saved["max_viewed_rows"], 16);
    }
}
