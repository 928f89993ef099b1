//! Data-facing traits for the inspection panel
//!
//! The cohort store is an opaque queryable collaborator: the engine looks
//! rows up by identifier and slices importance and value vectors out of
//! them. The model invoker is the single asynchronous boundary of the
//! system; the engine itself never awaits it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::weights::WeightVector;

/// Row identifier, unique within the active cohort
pub type RowId = usize;

/// A raw feature value with categorical labels already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Number(f64),
    Label(String),
    Missing,
}

impl FeatureValue {
    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// A single cohort row as handed out by a store
#[derive(Debug, Clone)]
pub struct CohortRow {
    /// Row identifier
    pub id: RowId,

    /// One entry per dataset feature
    pub values: Vec<FeatureValue>,

    /// Local importances, one inner vector per output class
    pub importances: Vec<Vec<f64>>,
}

/// Trait for cohort stores
///
/// Row representations must stay stable for a given identifier for the
/// lifetime of the cohort.
pub trait CohortStore: Send + Sync {
    /// Get the source name/path
    fn source_name(&self) -> &str;

    /// Total row count of the cohort
    fn row_count(&self) -> usize;

    /// Names of the dataset features, in column order
    fn feature_names(&self) -> &[String];

    /// Number of features covered by the local explanation
    fn local_explanation_feature_count(&self) -> usize;

    /// Number of output classes the explanation was computed for
    fn class_count(&self) -> usize;

    /// Look up a row by identifier
    fn get_row(&self, id: RowId) -> Option<CohortRow>;

    /// First `local_explanation_feature_count` importances of `row` under
    /// the given weight vector
    fn slice_local_explanation(&self, row: &CohortRow, weight: &WeightVector) -> Vec<f64> {
        let mut combined = weight.combine(&row.importances);
        combined.truncate(self.local_explanation_feature_count());
        combined
    }

    /// Feature values of `row` at the local-explanation boundary
    fn slice_feature_values(&self, row: &CohortRow) -> Vec<FeatureValue> {
        row.values
            .iter()
            .take(self.local_explanation_feature_count())
            .cloned()
            .collect()
    }
}

/// Injected model-invocation capability
///
/// Consumed by the plotting collaborator for what-if predictions. When a
/// newer selection supersedes an in-flight call, the caller flips the watch
/// channel to signal cancellation; implementations should return early once
/// the signal reads `true`.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Run the model over raw feature rows and return one prediction vector
    /// per row
    async fn invoke(
        &self,
        rows: Vec<Vec<FeatureValue>>,
        cancel: watch::Receiver<bool>,
    ) -> anyhow::Result<Vec<Vec<f64>>>;
}
