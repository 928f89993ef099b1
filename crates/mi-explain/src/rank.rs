//! Feature ranking for the shared plot axis

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::aggregate::ImportanceSeries;

/// Index permutation reordering the feature axis by importance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRanking {
    /// Feature indices, most important first; empty when no series is
    /// included
    pub order: Vec<usize>,

    /// Index of the series the ranking is derived from; `None` leaves the
    /// plot in natural feature order
    pub reference_series: Option<usize>,
}

/// Indices that would sort `values` ascending
///
/// The sort is stable: equal values keep their original relative order.
pub fn sort_indices(values: &[f64]) -> Vec<usize> {
    (0..values.len())
        .sorted_by_key(|&index| OrderedFloat(values[index]))
        .collect()
}

impl FeatureRanking {
    /// Rank features by the first included series' raw importances:
    /// ascending stable sort, then reversed for descending order
    pub fn from_series(series: &[ImportanceSeries]) -> Self {
        match series.first() {
            Some(reference) => {
                let mut order = sort_indices(&reference.raw_importances);
                order.reverse();
                Self {
                    order,
                    reference_series: Some(0),
                }
            }
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(raw_importances: Vec<f64>) -> ImportanceSeries {
        ImportanceSeries {
            id: 0,
            color_index: 0,
            name: "Row 0".to_string(),
            raw_importances,
            raw_feature_values: Vec::new(),
        }
    }

    #[test]
    fn test_ascending_sort_indices() {
        assert_eq!(sort_indices(&[3.0, -5.0, 1.0, 0.0]), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_ranking_is_reversed_ascending() {
        let ranking = FeatureRanking::from_series(&[series(vec![3.0, -5.0, 1.0, 0.0])]);
        assert_eq!(ranking.order, vec![0, 2, 3, 1]);
        assert_eq!(ranking.reference_series, Some(0));
    }

    #[test]
    fn test_ranking_ties_reverse_original_order() {
        // Stable ascending sort keeps 1 before 3 for the tied value, so the
        // reversal puts 3 before 1
        let ranking = FeatureRanking::from_series(&[series(vec![2.0, 1.0, 0.0, 1.0])]);
        assert_eq!(ranking.order, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_first_series_is_the_reference() {
        let ranking = FeatureRanking::from_series(&[
            series(vec![0.0, 1.0]),
            series(vec![9.0, -9.0]),
        ]);
        assert_eq!(ranking.order, vec![1, 0]);
        assert_eq!(ranking.reference_series, Some(0));
    }

    #[test]
    fn test_empty_series_means_no_ranking() {
        let ranking = FeatureRanking::from_series(&[]);
        assert!(ranking.order.is_empty());
        assert_eq!(ranking.reference_series, None);
    }
}
