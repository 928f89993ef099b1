//! In-memory cohort store backed by arrow record batches

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use tracing::debug;

use mi_core::{CohortRow, CohortStore, FeatureValue, RowId};

use crate::schema::{ExplanationMetadata, FeatureMeta};
use crate::DataError;

/// In-memory cohort store
///
/// Feature values live in a single record batch, one column per feature;
/// local importances are per-class row-major matrices. Every shape is
/// checked at construction so that downstream slicing never has to.
#[derive(Debug)]
pub struct MemoryCohort {
    name: String,
    metadata: ExplanationMetadata,
    feature_names: Vec<String>,
    values: RecordBatch,
    /// Per-class importance matrices, indexed [class][row][feature]
    importances: Vec<Vec<Vec<f64>>>,
}

impl MemoryCohort {
    /// Create a cohort store from a value batch and importance matrices
    pub fn new(
        name: impl Into<String>,
        metadata: ExplanationMetadata,
        values: RecordBatch,
        importances: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, DataError> {
        if values.num_columns() != metadata.feature_count() {
            return Err(DataError::ShapeMismatch {
                context: "dataset columns",
                expected: metadata.feature_count(),
                actual: values.num_columns(),
            });
        }
        if importances.len() != metadata.class_names.len() {
            return Err(DataError::ShapeMismatch {
                context: "importance classes",
                expected: metadata.class_names.len(),
                actual: importances.len(),
            });
        }
        for class_matrix in &importances {
            if class_matrix.len() != values.num_rows() {
                return Err(DataError::ShapeMismatch {
                    context: "importance rows",
                    expected: values.num_rows(),
                    actual: class_matrix.len(),
                });
            }
            for row in class_matrix {
                if row.len() != metadata.feature_count() {
                    return Err(DataError::ShapeMismatch {
                        context: "importance vector",
                        expected: metadata.feature_count(),
                        actual: row.len(),
                    });
                }
            }
        }

        let name = name.into();
        debug!(
            source = %name,
            rows = values.num_rows(),
            features = metadata.feature_count(),
            "cohort store created"
        );

        Ok(Self {
            name,
            feature_names: metadata.feature_names(),
            metadata,
            values,
            importances,
        })
    }

    /// Create a cohort store from row-major numeric feature data
    pub fn from_rows(
        name: impl Into<String>,
        metadata: ExplanationMetadata,
        rows: &[Vec<f64>],
        importances: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, DataError> {
        let feature_count = metadata.feature_count();
        for row in rows {
            if row.len() != feature_count {
                return Err(DataError::ShapeMismatch {
                    context: "dataset row",
                    expected: feature_count,
                    actual: row.len(),
                });
            }
        }

        let fields: Vec<Field> = metadata
            .features
            .iter()
            .map(|meta| Field::new(&meta.label, DataType::Float64, false))
            .collect();
        let columns: Vec<ArrayRef> = (0..feature_count)
            .map(|col| {
                let column: Vec<f64> = rows.iter().map(|row| row[col]).collect();
                Arc::new(Float64Array::from(column)) as ArrayRef
            })
            .collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;

        Self::new(name, metadata, batch, importances)
    }

    /// Explanation metadata for this cohort
    pub fn metadata(&self) -> &ExplanationMetadata {
        &self.metadata
    }

    fn resolve_numeric(meta: &FeatureMeta, value: f64) -> FeatureValue {
        if meta.is_categorical && value >= 0.0 && value.fract() == 0.0 {
            if let Some(label) = meta.resolve_category(value as usize) {
                return FeatureValue::Label(label.to_string());
            }
        }
        FeatureValue::Number(value)
    }

    fn value_at(&self, row: usize, col: usize) -> FeatureValue {
        let column = self.values.column(col);
        if column.is_null(row) {
            return FeatureValue::Missing;
        }

        let meta = &self.metadata.features[col];
        match column.data_type() {
            DataType::Float64 => {
                if let Some(array) = column.as_any().downcast_ref::<Float64Array>() {
                    return Self::resolve_numeric(meta, array.value(row));
                }
            }
            DataType::Int64 => {
                if let Some(array) = column.as_any().downcast_ref::<Int64Array>() {
                    return Self::resolve_numeric(meta, array.value(row) as f64);
                }
            }
            DataType::Utf8 => {
                if let Some(array) = column.as_any().downcast_ref::<StringArray>() {
                    return FeatureValue::Label(array.value(row).to_string());
                }
            }
            _ => {}
        }

        // Fall back to the display representation for anything else
        match array_value_to_string(column, row) {
            Ok(text) => FeatureValue::Label(text),
            Err(_) => FeatureValue::Missing,
        }
    }
}

impl CohortStore for MemoryCohort {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.values.num_rows()
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn local_explanation_feature_count(&self) -> usize {
        self.metadata.local_explanation_feature_count
    }

    fn class_count(&self) -> usize {
        self.metadata.class_names.len()
    }

    fn get_row(&self, id: RowId) -> Option<CohortRow> {
        if id >= self.values.num_rows() {
            return None;
        }

        let values = (0..self.values.num_columns())
            .map(|col| self.value_at(id, col))
            .collect();
        let importances = self
            .importances
            .iter()
            .map(|class_matrix| class_matrix[id].clone())
            .collect();

        Some(CohortRow {
            id,
            values,
            importances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mi_core::WeightVector;

    fn metadata() -> ExplanationMetadata {
        ExplanationMetadata::new(
            vec![
                FeatureMeta::numeric("age"),
                FeatureMeta::categorical("region", vec!["east".into(), "west".into()]),
            ],
            vec!["reject".into(), "approve".into()],
            2,
        )
        .unwrap()
    }

    fn importances(rows: usize) -> Vec<Vec<Vec<f64>>> {
        vec![vec![vec![0.1, -0.2]; rows], vec![vec![-0.1, 0.2]; rows]]
    }

    #[test]
    fn test_rows_resolve_categorical_labels() {
        let cohort = MemoryCohort::from_rows(
            "unit",
            metadata(),
            &[vec![34.0, 1.0], vec![51.0, 0.0]],
            importances(2),
        )
        .unwrap();

        let row = cohort.get_row(0).unwrap();
        assert_eq!(row.values[0], FeatureValue::Number(34.0));
        assert_eq!(row.values[1], FeatureValue::Label("west".to_string()));

        assert!(cohort.get_row(2).is_none());
    }

    #[test]
    fn test_slicing_through_store_trait() {
        let cohort = MemoryCohort::from_rows(
            "unit",
            metadata(),
            &[vec![34.0, 1.0]],
            importances(1),
        )
        .unwrap();

        let row = cohort.get_row(0).unwrap();
        let sliced = cohort.slice_local_explanation(&row, &WeightVector::Class(1));
        assert_eq!(sliced, vec![-0.1, 0.2]);

        let averaged = cohort.slice_local_explanation(&row, &WeightVector::AbsoluteAverage);
        assert_eq!(averaged, vec![0.1, 0.2]);
    }

    #[test]
    fn test_construction_rejects_shape_mismatches() {
        // Wrong number of classes
        let error = MemoryCohort::from_rows(
            "unit",
            metadata(),
            &[vec![34.0, 1.0]],
            vec![vec![vec![0.1, -0.2]]],
        )
        .unwrap_err();
        assert!(matches!(
            error,
            DataError::ShapeMismatch { context: "importance classes", .. }
        ));

        // Importance vector shorter than the feature count
        let mut bad = importances(1);
        bad[0][0].pop();
        let error = MemoryCohort::from_rows("unit", metadata(), &[vec![34.0, 1.0]], bad)
            .unwrap_err();
        assert!(matches!(
            error,
            DataError::ShapeMismatch { context: "importance vector", .. }
        ));

        // Dataset row shorter than the feature count
        let error = MemoryCohort::from_rows("unit", metadata(), &[vec![34.0]], importances(1))
            .unwrap_err();
        assert!(matches!(
            error,
            DataError::ShapeMismatch { context: "dataset row", .. }
        ));
    }
}
