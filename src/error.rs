//! Error types for dataset loading and statistical analysis
//!
//! Every error is terminal for the step that raised it. Nothing is retried and
//! nothing is swallowed: a pipeline step either yields a valid statistic or an
//! `AnalysisError` describing why it could not.

use thiserror::Error;

/// Errors that can occur while loading or analysing a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The named dataset could not be read or parsed
    #[error("Failed to load dataset: {0}")]
    Load(String),

    /// A referenced attribute does not exist on the dataset schema
    #[error("Attribute '{attribute}' does not exist in the dataset schema")]
    Data { attribute: String },

    /// The outcome attribute is not exactly binary
    #[error("Schema error: {0}")]
    Schema(String),

    /// Zero-variance input where a standard deviation is used as a divisor
    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// Too few values for the requested statistic
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Invalid analysis configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failure reported by the underlying statistics primitives
    #[error("Statistics backend error: {0}")]
    Statistics(String),
}

impl AnalysisError {
    /// Shorthand for a missing-attribute error
    pub fn missing_attribute(attribute: impl Into<String>) -> Self {
        Self::Data {
            attribute: attribute.into(),
        }
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        Self::Load(err.to_string())
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_message() {
        let err = AnalysisError::missing_attribute("age");
        assert_eq!(
            err.to_string(),
            "Attribute 'age' does not exist in the dataset schema"
        );
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: AnalysisError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
