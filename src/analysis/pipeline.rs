// The analysis pipeline, run once from top to bottom
//
// Load -> Filter -> (Describe, Standardize, Partition) -> Compare
//
// The dataset is passed in by reference and never modified; every step derives
// a new value from the previous one.

use crate::analysis::config::AnalysisConfig;
use crate::analysis::density::{log1p_transform, GaussianKde, Histogram};
use crate::analysis::describe::{describe, describe_by};
use crate::analysis::joint::joint_distribution;
use crate::analysis::normality::ProbabilityPlot;
use crate::analysis::partition::partition_by_outcome;
use crate::analysis::report::{AnalysisReport, SignificanceVerdict};
use crate::analysis::standardize::Standardizer;
use crate::dataset::{Dataset, DatasetSource};
use crate::error::Result;

/// Load the configured dataset from `source` and analyse it
pub fn load_and_run(source: &dyn DatasetSource, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let dataset = source.load(&config.dataset)?;
    run_analysis(&dataset, config)
}

/// Run the full analysis over an already-loaded dataset
///
/// # Example
/// ```
/// use passenger_eda::analysis::{run_analysis, AnalysisConfig};
/// use passenger_eda::dataset::Dataset;
///
/// let csv = "survived,age,fare,class\n\
///            0,22,7.25,Third\n1,38,71.28,First\n1,26,7.93,Third\n1,35,53.1,First\n\
///            0,35,8.05,Third\n0,,8.46,Third\n0,54,51.86,First\n0,2,21.08,Third\n\
///            1,27,11.13,Second\n1,14,30.07,Second\n";
/// let ds = Dataset::from_csv_reader("titanic", csv.as_bytes()).unwrap();
///
/// let report = run_analysis(&ds, &AnalysisConfig::default()).unwrap();
/// assert_eq!(report.total_records, 10);
/// assert_eq!(report.filtered_records, 9);
/// assert_eq!(report.test.first.count + report.test.second.count, 9);
/// ```
pub fn run_analysis(dataset: &Dataset, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let attribute = config.attribute.as_str();
    let outcome = config.outcome.as_str();

    tracing::info!(
        dataset = dataset.name(),
        attribute,
        outcome,
        records = dataset.len(),
        "starting analysis"
    );

    // Filter
    let filtered = dataset.filter_present(attribute)?;
    tracing::info!(
        kept = filtered.len(),
        dropped = dataset.len() - filtered.len(),
        "filtered records without '{}'",
        attribute
    );

    // Describe
    let summary = describe(&filtered, attribute)?;
    let by_outcome = describe_by(&filtered, attribute, &[outcome])?;
    let by_outcome_and_hue = match &config.hue {
        Some(hue) => describe_by(&filtered, attribute, &[outcome, hue.as_str()])?,
        None => Vec::new(),
    };

    // Distribution shape
    let values = filtered.numeric_values(attribute)?;
    let histogram = Histogram::sqrt_rule(&values)?;
    let density = GaussianKde::fit(&values, config.kde_bandwidth)?
        .curve(config.kde_grid_points, config.kde_cut)?;
    let log_density = if values.iter().all(|&v| v > -1.0) {
        Some(
            GaussianKde::fit(&log1p_transform(&values), config.log_kde_bandwidth)?
                .curve(config.kde_grid_points, config.kde_cut)?,
        )
    } else {
        tracing::warn!(attribute, "values <= -1 present, skipping log density");
        None
    };

    // Joint distribution with a second attribute, over the whole dataset
    let joint = match &config.joint {
        Some(other) => Some(joint_distribution(
            dataset,
            attribute,
            other,
            config.joint_max,
            config.joint_bins,
        )?),
        None => None,
    };

    // Standardize and check the normality assumption
    let standardizer = Standardizer::fit(&values)?;
    let z_scores = standardizer.transform_all(&values);
    let normality = ProbabilityPlot::against_normal(&z_scores)?;
    tracing::debug!(r = normality.r, "probability plot fit");

    // Partition and compare
    let groups = partition_by_outcome(&filtered, outcome)?;
    let test = groups.compare(attribute, config.variance)?;
    let verdict = SignificanceVerdict::from_pvalue(test.pvalue, config.significance_level);

    tracing::info!(
        statistic = test.statistic,
        pvalue = test.pvalue,
        verdict = ?verdict,
        "analysis complete"
    );

    Ok(AnalysisReport {
        dataset: dataset.name().to_string(),
        attribute: attribute.to_string(),
        outcome: outcome.to_string(),
        hue: config.hue.clone(),
        total_records: dataset.len(),
        filtered_records: filtered.len(),
        summary,
        by_outcome,
        by_outcome_and_hue,
        histogram,
        density,
        log_density,
        joint,
        standardizer,
        normality,
        group_labels: [groups.first.label, groups.second.label],
        test,
        significance_level: config.significance_level,
        verdict,
    })
}
