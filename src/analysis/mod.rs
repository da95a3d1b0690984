// Statistical analysis of a continuous attribute across a binary outcome
//
// Does age differ between passengers who survived and those who did not?
// The pipeline answers with a two-sample t-test, after the descriptive
// groundwork that justifies it: summaries overall and per group, the
// distribution shape, and a normal probability plot of the z-scores.
//
// Implementation:
// - Uses aprender (crates.io) for quantiles
// - Uses statrs (crates.io) for the Student t and normal distributions
// - Uses trueno (crates.io) vectors as the input to aprender statistics
// - Pure functions over an immutable Dataset; no shared state

mod config;
pub mod density;
mod describe;
pub mod joint;
pub mod normality;
mod partition;
mod pipeline;
mod report;
mod standardize;
mod statistics;

pub use config::AnalysisConfig;
pub use density::{log1p_transform, sqrt_rule_bins, Bandwidth, DensityCurve, GaussianKde, Histogram};
pub use describe::{describe, describe_by, GroupSummary, Summary};
pub use joint::{joint_distribution, pearson_r, JointDistribution, JointHistogram};
pub use normality::{normal_quantile, ProbabilityPlot};
pub use partition::{partition_by_outcome, OutcomeGroup, OutcomeGroups};
pub use pipeline::{load_and_run, run_analysis};
pub use report::{AnalysisReport, SignificanceVerdict};
pub use standardize::{standardize, Standardizer};
pub use statistics::{
    compare_means, two_tailed_pvalue, SampleMoments, TwoSampleTest, VarianceAssumption,
};
