//! Weight vector selection for multi-class importances

use serde::{Deserialize, Serialize};

/// Selector for which output class's importances are being viewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightVector {
    /// Mean of absolute importances across all classes
    AbsoluteAverage,
    /// A single output class
    Class(usize),
}

impl WeightVector {
    /// Combine per-class importance vectors into a single vector
    ///
    /// An out-of-range class index yields an empty vector; validation
    /// against the cohort's class count happens upstream.
    pub fn combine(&self, per_class: &[Vec<f64>]) -> Vec<f64> {
        match self {
            WeightVector::AbsoluteAverage => {
                let Some(first) = per_class.first() else {
                    return Vec::new();
                };
                let mut combined = vec![0.0; first.len()];
                for class in per_class {
                    for (slot, value) in combined.iter_mut().zip(class) {
                        *slot += value.abs();
                    }
                }
                for slot in combined.iter_mut() {
                    *slot /= per_class.len() as f64;
                }
                combined
            }
            WeightVector::Class(index) => per_class.get(*index).cloned().unwrap_or_default(),
        }
    }

    /// Display label for weight dropdown options
    pub fn label(&self, class_names: &[String]) -> String {
        match self {
            WeightVector::AbsoluteAverage => "Class importance (absolute average)".to_string(),
            WeightVector::Class(index) => class_names
                .get(*index)
                .cloned()
                .unwrap_or_else(|| format!("Class {}", index)),
        }
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        WeightVector::AbsoluteAverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_average() {
        let per_class = vec![vec![1.0, -3.0], vec![-1.0, 1.0]];
        let combined = WeightVector::AbsoluteAverage.combine(&per_class);
        assert_eq!(combined, vec![1.0, 2.0]);
    }

    #[test]
    fn test_class_selection() {
        let per_class = vec![vec![1.0, -3.0], vec![-1.0, 1.0]];
        assert_eq!(WeightVector::Class(1).combine(&per_class), vec![-1.0, 1.0]);
        assert!(WeightVector::Class(2).combine(&per_class).is_empty());
    }

    #[test]
    fn test_labels() {
        let classes = vec!["cat".to_string(), "dog".to_string()];
        assert_eq!(WeightVector::Class(0).label(&classes), "cat");
        assert_eq!(WeightVector::Class(7).label(&classes), "Class 7");
    }
}
