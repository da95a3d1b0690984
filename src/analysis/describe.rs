// Descriptive statistics over present values
//
// `describe` summarizes one attribute of a dataset; `describe_by` does the same
// per group for any number of grouping keys, so "overall", "by outcome" and
// "by outcome and class" are all the same operation.

use crate::analysis::statistics::{ensure_finite, SampleMoments};
use crate::dataset::{Dataset, Value};
use crate::error::{AnalysisError, Result};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use std::collections::BTreeMap;
use trueno::Vector;

/// Count, mean, spread and five-number summary of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f32,
    /// Sample standard deviation; `None` for a single value
    pub std: Option<f32>,
    pub min: f32,
    /// 25th percentile (linear interpolation)
    pub q25: f32,
    pub median: f32,
    /// 75th percentile (linear interpolation)
    pub q75: f32,
    pub max: f32,
}

impl Summary {
    /// Summarize a non-empty sample
    pub fn of(values: &[f32]) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "cannot describe an empty sample".to_string(),
            ));
        }

        ensure_finite(values)?;

        let stat_err = |what: &str, e: String| AnalysisError::Statistics(format!("{}: {}", what, e));

        let (mean, std) = if values.len() < 2 {
            (values[0], None)
        } else {
            let moments = SampleMoments::of(values)?;
            (moments.mean, Some(moments.std_dev))
        };

        // R-7 quantiles, the same interpolation a dataframe describe() uses;
        // the 0th and 100th percentiles are the extremes
        let vec = Vector::from_slice(values);
        let stats = DescriptiveStats::new(&vec);
        let min = stats
            .quantile(0.0)
            .map_err(|e| stat_err("min", e.to_string()))?;
        let q25 = stats
            .quantile(0.25)
            .map_err(|e| stat_err("q25", e.to_string()))?;
        let median = stats
            .quantile(0.5)
            .map_err(|e| stat_err("median", e.to_string()))?;
        let q75 = stats
            .quantile(0.75)
            .map_err(|e| stat_err("q75", e.to_string()))?;
        let max = stats
            .quantile(1.0)
            .map_err(|e| stat_err("max", e.to_string()))?;

        Ok(Self {
            count: values.len(),
            mean,
            std,
            min,
            q25,
            median,
            q75,
            max,
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f32 {
        self.q75 - self.q25
    }
}

/// Summary of one group produced by `describe_by`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Grouping key values, in the order the keys were given
    pub key: Vec<Value>,
    pub summary: Summary,
}

impl GroupSummary {
    /// Key rendered as `a / b`
    pub fn label(&self) -> String {
        self.key
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Describe the present values of `attribute` across the whole dataset
///
/// # Example
/// ```
/// use passenger_eda::analysis::describe;
/// use passenger_eda::dataset::Dataset;
///
/// let ds = Dataset::from_csv_reader("t", "age\n20\n\n40\n".as_bytes()).unwrap();
/// let summary = describe(&ds, "age").unwrap();
/// assert_eq!(summary.count, 2);
/// assert_eq!(summary.mean, 30.0);
/// ```
pub fn describe(dataset: &Dataset, attribute: &str) -> Result<Summary> {
    Summary::of(&dataset.numeric_values(attribute)?)
}

/// Describe `attribute` separately for every combination of `keys`
///
/// Groups are ordered by key value. Records with a missing key value are left
/// out of the grouping, and groups without any present value of `attribute`
/// are omitted.
pub fn describe_by(dataset: &Dataset, attribute: &str, keys: &[&str]) -> Result<Vec<GroupSummary>> {
    if keys.is_empty() {
        return Err(AnalysisError::Config(
            "describe_by needs at least one grouping key".to_string(),
        ));
    }

    let schema = dataset.schema();
    let value_index = schema.index_of(attribute)?;
    let key_indices = keys
        .iter()
        .map(|k| schema.index_of(k))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<Vec<Value>, Vec<f32>> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in dataset.records() {
        let key: Vec<Value> = key_indices
            .iter()
            .map(|&i| record.get(i).cloned().unwrap_or(Value::Missing))
            .collect();
        if key.iter().any(Value::is_missing) {
            dropped += 1;
            continue;
        }

        let values = groups.entry(key).or_default();
        if let Some(v) = record.get(value_index).and_then(Value::as_number) {
            values.push(v);
        }
    }

    if dropped > 0 {
        tracing::warn!(
            keys = ?keys,
            dropped,
            "records with a missing grouping key were left out"
        );
    }

    groups
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| {
            Ok(GroupSummary {
                key,
                summary: Summary::of(&values)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
survived,age,class
0,22,Third
1,38,First
1,26,Third
1,35,First
0,35,Third
0,,Third
0,54,First
,40,First
";

    fn sample() -> Dataset {
        Dataset::from_csv_reader("titanic", SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_summary_quartiles_interpolate() {
        let s = Summary::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-6);
        assert!((s.q25 - 1.75).abs() < 1e-5);
        assert!((s.median - 2.5).abs() < 1e-5);
        assert!((s.q75 - 3.25).abs() < 1e-5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.iqr() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_summary_single_value_has_no_std() {
        let s = Summary::of(&[7.0]).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(matches!(
            Summary::of(&[]),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_summary_rejects_non_finite() {
        assert!(matches!(
            Summary::of(&[10.0, f32::INFINITY, 30.0]),
            Err(AnalysisError::Statistics(_))
        ));
        assert!(matches!(
            Summary::of(&[f32::NAN]),
            Err(AnalysisError::Statistics(_))
        ));
    }

    #[test]
    fn test_describe_skips_infinite_cells() {
        let ds = Dataset::from_csv_reader("t", "age\n10\ninf\n30\n".as_bytes()).unwrap();
        let s = describe(&ds, "age").unwrap();
        assert_eq!(s.count, 2);
        assert!((s.mean - 20.0).abs() < 1e-6);
        assert_eq!(s.max, 30.0);
    }

    #[test]
    fn test_describe_ignores_missing() {
        let s = describe(&sample(), "age").unwrap();
        assert_eq!(s.count, 7);
        assert_eq!(s.min, 22.0);
        assert_eq!(s.max, 54.0);
    }

    #[test]
    fn test_describe_unknown_attribute() {
        assert_eq!(
            describe(&sample(), "fare").unwrap_err(),
            AnalysisError::missing_attribute("fare")
        );
    }

    #[test]
    fn test_describe_by_single_key() {
        let groups = describe_by(&sample(), "age", &["survived"]).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, vec![Value::Number(0.0)]);
        assert_eq!(groups[0].summary.count, 3);
        assert_eq!(groups[1].key, vec![Value::Number(1.0)]);
        assert_eq!(groups[1].summary.count, 3);
        assert!((groups[1].summary.mean - 33.0).abs() < 1e-5);
    }

    #[test]
    fn test_describe_by_two_keys() {
        let groups = describe_by(&sample(), "age", &["survived", "class"]).unwrap();
        let labels: Vec<String> = groups.iter().map(GroupSummary::label).collect();
        assert_eq!(labels, vec!["0 / First", "0 / Third", "1 / First", "1 / Third"]);
        assert_eq!(groups[1].summary.count, 2);
    }

    #[test]
    fn test_describe_by_requires_keys() {
        assert!(matches!(
            describe_by(&sample(), "age", &[]),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn test_describe_by_unknown_key() {
        assert_eq!(
            describe_by(&sample(), "age", &["deck"]).unwrap_err(),
            AnalysisError::missing_attribute("deck")
        );
    }
}
