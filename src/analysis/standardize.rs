//! Z-score standardization
//!
//! The mean and standard deviation are fitted once on the filtered subset and
//! then applied unchanged to every value.

use crate::analysis::statistics::SampleMoments;
use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Fitted z-score transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standardizer {
    pub mean: f32,
    /// Sample standard deviation used as the divisor
    pub std_dev: f32,
}

impl Standardizer {
    /// Fit on a sample of at least two values with nonzero spread
    pub fn fit(values: &[f32]) -> Result<Self> {
        let moments = SampleMoments::of(values)?;
        if moments.is_constant() {
            return Err(AnalysisError::DegenerateDistribution(format!(
                "standard deviation is zero over {} values (all equal to {})",
                moments.count, moments.mean
            )));
        }
        Ok(Self {
            mean: moments.mean,
            std_dev: moments.std_dev,
        })
    }

    pub fn transform(&self, value: f32) -> f32 {
        (value - self.mean) / self.std_dev
    }

    pub fn inverse_transform(&self, z: f32) -> f32 {
        z * self.std_dev + self.mean
    }

    pub fn transform_all(&self, values: &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

/// Z-scores of the present values of `attribute`, in record order
///
/// # Example
/// ```
/// use passenger_eda::analysis::standardize;
/// use passenger_eda::dataset::Dataset;
///
/// let ds = Dataset::from_csv_reader("t", "age\n10\n20\n30\n".as_bytes()).unwrap();
/// let z = standardize(&ds, "age").unwrap();
/// assert_eq!(z.len(), 3);
/// assert!((z[0] + 1.0).abs() < 1e-5 && z[1].abs() < 1e-5 && (z[2] - 1.0).abs() < 1e-5);
/// ```
pub fn standardize(dataset: &Dataset, attribute: &str) -> Result<Vec<f32>> {
    let values = dataset.numeric_values(attribute)?;
    let scaler = Standardizer::fit(&values)?;
    tracing::debug!(
        attribute,
        mean = scaler.mean,
        std_dev = scaler.std_dev,
        "standardizing"
    );
    Ok(scaler.transform_all(&values))
}
