//! Feature picker state
//!
//! Checkbox-driven subset selector over an immutable master feature list
//! with live substring search. Nothing reaches the caller until `apply`;
//! dismissing the panel simply drops the state.

use tracing::debug;

/// Callback invoked with the chosen subset when it is committed
pub type ApplyCallback = Box<dyn Fn(&[String]) + Send + Sync>;

/// Searchable checkbox selection over a master feature list
pub struct FeatureFilter {
    features: Vec<String>,
    searched_features: Vec<String>,
    selected_features: Vec<String>,
    on_apply: ApplyCallback,
}

impl FeatureFilter {
    /// Open the picker over a master feature list
    ///
    /// Everything starts visible and checked; an empty committed subset can
    /// only come from the user unchecking every feature.
    pub fn new(features: Vec<String>, on_apply: ApplyCallback) -> Self {
        Self {
            searched_features: features.clone(),
            selected_features: features.clone(),
            features,
            on_apply,
        }
    }

    /// Features matching the current search text, in master-list order
    pub fn searched_features(&self) -> &[String] {
        &self.searched_features
    }

    /// Features currently checked
    pub fn selected_features(&self) -> &[String] {
        &self.selected_features
    }

    /// Recompute the visible list from a search string
    ///
    /// Case-sensitive containment; an empty string shows the full list.
    /// The checked set is unaffected.
    pub fn search(&mut self, text: &str) {
        self.searched_features = self
            .features
            .iter()
            .filter(|feature| feature.contains(text))
            .cloned()
            .collect();
    }

    /// Check or uncheck a feature
    pub fn toggle(&mut self, feature: &str, checked: bool) {
        if checked {
            if !self.selected_features.iter().any(|f| f == feature) {
                self.selected_features.push(feature.to_string());
            }
        } else {
            self.selected_features.retain(|f| f != feature);
        }
    }

    /// Commit the current subset to the caller
    ///
    /// A pure read of current state; closing the panel is the caller's
    /// responsibility.
    pub fn apply(&self) {
        debug!(count = self.selected_features.len(), "feature subset applied");
        (self.on_apply)(&self.selected_features);
    }
}
