//! Importance series aggregation for the current selection

use serde::{Deserialize, Serialize};
use tracing::debug;

use mi_core::{CohortStore, FeatureValue, RowId, SelectionContext, WeightVector};

use crate::strings::format_row_label;

/// One row's local-importance explanation, ready for plotting
///
/// Rebuilt wholesale on every aggregation pass; consumers never mutate a
/// series in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceSeries {
    /// Row identifier
    pub id: RowId,

    /// Position within the eligibility list; drives the series color
    pub color_index: usize,

    /// Localized display name
    pub name: String,

    /// Local importances under the active weight vector
    pub raw_importances: Vec<f64>,

    /// Feature values with categorical labels resolved
    pub raw_feature_values: Vec<FeatureValue>,
}

/// Build one importance series per selected row, in eligibility order
///
/// A row's color index is its position in the eligibility list, not its
/// position in the selection, so a row keeps its color no matter which
/// other rows are toggled. Eligible identifiers missing from the store are
/// skipped without error.
pub fn aggregate_importances(
    store: &dyn CohortStore,
    context: &SelectionContext,
    weight: &WeightVector,
) -> Vec<ImportanceSeries> {
    let candidates: Vec<ImportanceSeries> = context
        .eligible
        .iter()
        .enumerate()
        .filter_map(|(color_index, &id)| {
            let Some(row) = store.get_row(id) else {
                debug!(id, "eligible row not found in cohort store");
                return None;
            };
            Some(ImportanceSeries {
                id,
                color_index,
                name: format_row_label(id),
                raw_importances: store.slice_local_explanation(&row, weight),
                raw_feature_values: store.slice_feature_values(&row),
            })
        })
        .collect();

    candidates
        .into_iter()
        .filter(|series| context.selected.contains(&series.id))
        .collect()
}
