use serde::{Deserialize, Serialize};

use crate::DataError;

/// Longest label shown verbatim before abridging kicks in
const MAX_LABEL_CHARS: usize = 16;

/// Metadata about a single dataset feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMeta {
    /// Full feature label
    pub label: String,

    /// Shortened label for narrow dropdowns and axis ticks
    pub abridged_label: String,

    /// Whether the feature takes discrete labelled values
    pub is_categorical: bool,

    /// Categorical value table, index-aligned with numeric codes
    pub sorted_categorical_values: Option<Vec<String>>,
}

impl FeatureMeta {
    /// Metadata for a numeric feature
    pub fn numeric(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            abridged_label: Self::abridge(&label),
            label,
            is_categorical: false,
            sorted_categorical_values: None,
        }
    }

    /// Metadata for a categorical feature with its value table
    pub fn categorical(label: impl Into<String>, values: Vec<String>) -> Self {
        let label = label.into();
        Self {
            abridged_label: Self::abridge(&label),
            label,
            is_categorical: true,
            sorted_categorical_values: Some(values),
        }
    }

    /// Resolve a numeric categorical code to its label
    pub fn resolve_category(&self, code: usize) -> Option<&str> {
        self.sorted_categorical_values
            .as_ref()
            .and_then(|values| values.get(code))
            .map(String::as_str)
    }

    fn abridge(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
            format!("{}...", head)
        }
    }
}

/// Model explanation metadata, validated at construction
///
/// Downstream slicing assumes consistent vector lengths, so a malformed
/// boundary is a fatal configuration error here rather than a partial
/// rendering later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationMetadata {
    /// Per-feature metadata, in column order
    pub features: Vec<FeatureMeta>,

    /// Output class names
    pub class_names: Vec<String>,

    /// Number of features covered by the local explanation
    pub local_explanation_feature_count: usize,
}

impl ExplanationMetadata {
    /// Create validated metadata
    pub fn new(
        features: Vec<FeatureMeta>,
        class_names: Vec<String>,
        local_explanation_feature_count: usize,
    ) -> Result<Self, DataError> {
        if local_explanation_feature_count > features.len() {
            return Err(DataError::ShapeMismatch {
                context: "local explanation boundary",
                expected: features.len(),
                actual: local_explanation_feature_count,
            });
        }
        if class_names.is_empty() {
            return Err(DataError::Other(
                "explanation metadata needs at least one output class".to_string(),
            ));
        }

        Ok(Self {
            features,
            class_names,
            local_explanation_feature_count,
        })
    }

    /// Number of dataset features
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Full feature labels, in column order
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|meta| meta.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abridged_labels() {
        let short = FeatureMeta::numeric("age");
        assert_eq!(short.abridged_label, "age");

        let long = FeatureMeta::numeric("capital_gain_last_quarter");
        assert_eq!(long.abridged_label, "capital_gain_...");
        assert_eq!(long.abridged_label.chars().count(), MAX_LABEL_CHARS);
    }

    #[test]
    fn test_category_resolution() {
        let meta = FeatureMeta::categorical("region", vec!["east".into(), "west".into()]);
        assert_eq!(meta.resolve_category(1), Some("west"));
        assert_eq!(meta.resolve_category(5), None);
    }

    #[test]
    fn test_boundary_must_fit_feature_count() {
        let features = vec![FeatureMeta::numeric("a"), FeatureMeta::numeric("b")];
        let error = ExplanationMetadata::new(features, vec!["c0".into()], 3).unwrap_err();
        assert!(matches!(error, DataError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_classes_required() {
        let features = vec![FeatureMeta::numeric("a")];
        let error = ExplanationMetadata::new(features, Vec::new(), 1).unwrap_err();
        assert!(matches!(error, DataError::Other(_)));
    }
}
