//! Partition a dataset by a binary outcome attribute

use crate::analysis::statistics::{compare_means, TwoSampleTest, VarianceAssumption};
use crate::dataset::{Dataset, Value};
use crate::error::{AnalysisError, Result};
use std::collections::BTreeSet;

/// Records sharing one outcome value
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeGroup {
    pub label: Value,
    pub records: Dataset,
}

/// The two disjoint, exhaustive groups of a binary outcome
///
/// `first` holds the smaller outcome value (e.g. 0 before 1).
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeGroups {
    pub outcome: String,
    pub first: OutcomeGroup,
    pub second: OutcomeGroup,
}

impl OutcomeGroups {
    /// Total number of records across both groups
    pub fn len(&self) -> usize {
        self.first.records.len() + self.second.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare the means of `attribute` between the first and second group
    pub fn compare(&self, attribute: &str, variance: VarianceAssumption) -> Result<TwoSampleTest> {
        let first = self.first.records.numeric_values(attribute)?;
        let second = self.second.records.numeric_values(attribute)?;
        compare_means(&first, &second, variance)
    }
}

/// Split `dataset` into two groups keyed by `outcome`
///
/// # Errors
/// - `Data` if `outcome` is not in the schema
/// - `Schema` if any record lacks an outcome value, or the outcome does not take
///   exactly two distinct values
pub fn partition_by_outcome(dataset: &Dataset, outcome: &str) -> Result<OutcomeGroups> {
    let index = dataset.schema().index_of(outcome)?;

    let mut labels = BTreeSet::new();
    for (row, record) in dataset.records().iter().enumerate() {
        match record.get(index) {
            Some(value) if !value.is_missing() => {
                labels.insert(value.clone());
            }
            _ => {
                return Err(AnalysisError::Schema(format!(
                    "outcome '{}' is missing on record {}",
                    outcome, row
                )));
            }
        }
    }

    let labels: Vec<Value> = labels.into_iter().collect();
    let [first_label, second_label] = <[Value; 2]>::try_from(labels).map_err(|labels| {
        AnalysisError::Schema(format!(
            "outcome '{}' must take exactly 2 distinct values, found {}: [{}]",
            outcome,
            labels.len(),
            labels
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    let group = |label: Value| {
        let records = dataset.retain(|r| r.get(index) == Some(&label));
        OutcomeGroup { label, records }
    };
    let first = group(first_label);
    let second = group(second_label);

    tracing::debug!(
        outcome,
        first = %first.label,
        first_len = first.records.len(),
        second = %second.label,
        second_len = second.records.len(),
        "partitioned by outcome"
    );

    Ok(OutcomeGroups {
        outcome: outcome.to_string(),
        first,
        second,
    })
}
