// Configuration for the survival analysis pipeline
//
// Defaults reproduce the classic Titanic walk-through: age compared across
// survival outcome, broken down by passenger class, pooled-variance t-test at
// the 5% level.

use crate::analysis::density::Bandwidth;
use crate::analysis::statistics::VarianceAssumption;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one run of the analysis pipeline
///
/// # Example
/// ```
/// use passenger_eda::analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.attribute, "age");
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name handed to the dataset source
    pub dataset: String,

    /// Continuous attribute that is filtered, described and compared
    pub attribute: String,

    /// Binary attribute used to partition records into two groups
    pub outcome: String,

    /// Optional secondary grouping key for the hue breakdown (e.g. class)
    pub hue: Option<String>,

    /// Significance level (alpha) for the two-tailed test
    ///
    /// - 0.05 (default): the traditional cutoff
    /// - 0.01: stricter, fewer false positives
    pub significance_level: f64,

    /// Pooled (Student) or unequal-variance (Welch) t-test
    pub variance: VarianceAssumption,

    /// Bandwidth for the density estimate of the raw attribute
    pub kde_bandwidth: Bandwidth,

    /// Bandwidth for the density estimate of `ln(attribute + 1)`
    pub log_kde_bandwidth: Bandwidth,

    /// Number of grid points each density curve is evaluated on
    pub kde_grid_points: usize,

    /// How many bandwidths the density grid extends past the data range
    pub kde_cut: f32,

    /// Second numeric attribute paired with `attribute` for the joint
    /// distribution (e.g. fare); `None` skips it
    pub joint: Option<String>,

    /// Records whose joint attribute is not below this are trimmed first
    pub joint_max: Option<f32>,

    /// Grid bins per axis of the joint histogram
    pub joint_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset: "titanic".to_string(),
            attribute: "age".to_string(),
            outcome: "survived".to_string(),
            hue: Some("class".to_string()),
            significance_level: 0.05,
            variance: VarianceAssumption::Pooled,
            kde_bandwidth: Bandwidth::Scott,
            log_kde_bandwidth: Bandwidth::Factor(0.25),
            kde_grid_points: 100,
            kde_cut: 3.0,
            joint: Some("fare".to_string()),
            joint_max: Some(300.0),
            joint_bins: 20,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; absent keys take their default values
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("dataset", &self.dataset),
            ("attribute", &self.attribute),
            ("outcome", &self.outcome),
        ] {
            if value.trim().is_empty() {
                return Err(AnalysisError::Config(format!("{} must not be empty", field)));
            }
        }

        if self.attribute == self.outcome {
            return Err(AnalysisError::Config(format!(
                "attribute and outcome must differ, both are '{}'",
                self.attribute
            )));
        }

        for (field, value) in [("hue", &self.hue), ("joint", &self.joint)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(AnalysisError::Config(format!("{} must not be empty", field)));
            }
        }

        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AnalysisError::Config(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        self.kde_bandwidth.validate()?;
        self.log_kde_bandwidth.validate()?;

        if self.kde_grid_points < 2 {
            return Err(AnalysisError::Config(format!(
                "kde_grid_points must be >= 2, got {}",
                self.kde_grid_points
            )));
        }

        if !(self.kde_cut >= 0.0 && self.kde_cut.is_finite()) {
            return Err(AnalysisError::Config(format!(
                "kde_cut must be a non-negative number, got {}",
                self.kde_cut
            )));
        }

        if let Some(max) = self.joint_max {
            if !max.is_finite() {
                return Err(AnalysisError::Config(format!(
                    "joint_max must be a finite number, got {}",
                    max
                )));
            }
        }

        if self.joint_bins == 0 {
            return Err(AnalysisError::Config(
                "joint_bins must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
