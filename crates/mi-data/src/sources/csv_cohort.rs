use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashSet;
use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;
use tracing::info;

use crate::cohort::MemoryCohort;
use crate::schema::{ExplanationMetadata, FeatureMeta};
use crate::DataError;

/// Rows sampled for column type detection
const MAX_SAMPLE_ROWS: usize = 1000;

/// CSV-backed cohort loading
///
/// Combines feature values read from a CSV file with the per-class local
/// importance matrices the explanation backend produced for the same rows.
pub struct CsvCohort;

impl CsvCohort {
    /// Load cohort feature values from a CSV file
    ///
    /// Column types are detected from a sample of the file. String columns
    /// become categorical features with their sorted distinct values as the
    /// label table. When no local-explanation boundary is given, the
    /// explanation covers every column.
    pub async fn load(
        path: PathBuf,
        class_names: Vec<String>,
        importances: Vec<Vec<Vec<f64>>>,
        local_explanation_feature_count: Option<usize>,
    ) -> Result<MemoryCohort, DataError> {
        tokio::task::spawn_blocking(move || {
            Self::load_blocking(
                &path,
                class_names,
                importances,
                local_explanation_feature_count,
            )
        })
        .await?
    }

    fn load_blocking(
        path: &Path,
        class_names: Vec<String>,
        importances: Vec<Vec<Vec<f64>>>,
        local_explanation_feature_count: Option<usize>,
    ) -> Result<MemoryCohort, DataError> {
        let file = File::open(path)?;
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();
        if headers.is_empty() {
            return Err(DataError::MissingColumn("<csv header row>".to_string()));
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(|value| value.to_string()).collect());
        }

        let sample = &rows[..rows.len().min(MAX_SAMPLE_ROWS)];

        let mut fields = Vec::new();
        let mut columns: Vec<ArrayRef> = Vec::new();
        let mut features = Vec::new();

        for (col_idx, header) in headers.iter().enumerate() {
            let data_type = Self::detect_column_type(sample, col_idx);
            let array = Self::build_column(&rows, col_idx, &data_type);

            if data_type == DataType::Utf8 {
                let mut distinct: Vec<String> = rows
                    .iter()
                    .filter_map(|row| row.get(col_idx))
                    .filter(|value| !value.is_empty())
                    .cloned()
                    .collect::<AHashSet<_>>()
                    .into_iter()
                    .collect();
                distinct.sort();
                features.push(FeatureMeta::categorical(header, distinct));
            } else {
                features.push(FeatureMeta::numeric(header));
            }

            fields.push(Field::new(header, data_type, true));
            columns.push(array);
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        let local_count = local_explanation_feature_count.unwrap_or(headers.len());
        let metadata = ExplanationMetadata::new(features, class_names, local_count)?;

        info!(path = %path.display(), rows = batch.num_rows(), "cohort loaded from CSV");
        MemoryCohort::new(path.display().to_string(), metadata, batch, importances)
    }

    /// Detect column type from sample data
    fn detect_column_type(samples: &[Vec<String>], col_idx: usize) -> DataType {
        let mut is_int = true;
        let mut is_float = true;

        for row in samples {
            if let Some(value) = row.get(col_idx) {
                if value.is_empty() {
                    continue;
                }
                if is_int && value.parse::<i64>().is_err() {
                    is_int = false;
                }
                if is_float && value.parse::<f64>().is_err() {
                    is_float = false;
                }
            }
        }

        if is_int {
            DataType::Int64
        } else if is_float {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }

    /// Build an arrow array for one column; unparseable or empty cells
    /// become nulls
    fn build_column(rows: &[Vec<String>], col_idx: usize, data_type: &DataType) -> ArrayRef {
        match data_type {
            DataType::Int64 => {
                let mut builder = Int64Builder::new();
                for row in rows {
                    match row.get(col_idx).map(String::as_str) {
                        Some(value) if !value.is_empty() => match value.parse::<i64>() {
                            Ok(parsed) => builder.append_value(parsed),
                            Err(_) => builder.append_null(),
                        },
                        _ => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
            DataType::Float64 => {
                let mut builder = Float64Builder::new();
                for row in rows {
                    match row.get(col_idx).map(String::as_str) {
                        Some(value) if !value.is_empty() => match value.parse::<f64>() {
                            Ok(parsed) => builder.append_value(parsed),
                            Err(_) => builder.append_null(),
                        },
                        _ => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
            _ => {
                let mut builder = StringBuilder::new();
                for row in rows {
                    match row.get(col_idx).map(String::as_str) {
                        Some(value) if !value.is_empty() => builder.append_value(value),
                        _ => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mi_core::{CohortStore, FeatureValue};

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_detects_types_and_categories() {
        let path = write_fixture(
            "mi_data_csv_cohort_test.csv",
            "age,income,region\n34,51000.5,west\n58,,east\n41,72000.0,west\n",
        );

        let importances = vec![vec![vec![0.0; 3]; 3]];
        let cohort = CsvCohort::load(path.clone(), vec!["approve".into()], importances, None)
            .await
            .unwrap();

        assert_eq!(cohort.row_count(), 3);
        let expected = vec!["age".to_string(), "income".to_string(), "region".to_string()];
        assert_eq!(cohort.feature_names(), expected.as_slice());

        let region = &cohort.metadata().features[2];
        assert!(region.is_categorical);
        assert_eq!(
            region.sorted_categorical_values.as_deref(),
            Some(&["east".to_string(), "west".to_string()][..])
        );

        let row = cohort.get_row(1).unwrap();
        assert_eq!(row.values[0], FeatureValue::Number(58.0));
        assert_eq!(row.values[1], FeatureValue::Missing);
        assert_eq!(row.values[2], FeatureValue::Label("east".to_string()));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_load_rejects_mismatched_importances() {
        let path = write_fixture(
            "mi_data_csv_cohort_mismatch_test.csv",
            "age\n34\n58\n",
        );

        // Two rows in the file, one importance row supplied
        let importances = vec![vec![vec![0.0]]];
        let error = CsvCohort::load(path.clone(), vec!["approve".into()], importances, None)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            DataError::ShapeMismatch { context: "importance rows", .. }
        ));

        let _ = std::fs::remove_file(path);
    }
}
