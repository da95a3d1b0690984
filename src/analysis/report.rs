// Analysis report: everything the pipeline derived, in one serializable value

use crate::analysis::density::{DensityCurve, Histogram};
use crate::analysis::describe::{GroupSummary, Summary};
use crate::analysis::joint::JointDistribution;
use crate::analysis::normality::ProbabilityPlot;
use crate::analysis::standardize::Standardizer;
use crate::analysis::statistics::TwoSampleTest;
use crate::dataset::Value;
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of comparing the p-value with the significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceVerdict {
    /// p < alpha: reject the null hypothesis of equal means
    Significant,
    /// p >= alpha: the difference is compatible with random variation
    NotSignificant,
}

impl SignificanceVerdict {
    pub fn from_pvalue(pvalue: f32, significance_level: f64) -> Self {
        if (pvalue as f64) < significance_level {
            SignificanceVerdict::Significant
        } else {
            SignificanceVerdict::NotSignificant
        }
    }
}

/// Result of one full pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub dataset: String,
    pub attribute: String,
    pub outcome: String,
    pub hue: Option<String>,

    /// Records in the loaded dataset
    pub total_records: usize,
    /// Records with the attribute present
    pub filtered_records: usize,

    pub summary: Summary,
    pub by_outcome: Vec<GroupSummary>,
    /// Empty when no hue is configured
    pub by_outcome_and_hue: Vec<GroupSummary>,

    pub histogram: Histogram,
    pub density: DensityCurve,
    /// Density of `ln(attribute + 1)`; absent if any value is <= -1
    pub log_density: Option<DensityCurve>,

    /// Paired view with a second attribute, when one is configured
    pub joint: Option<JointDistribution>,

    pub standardizer: Standardizer,
    pub normality: ProbabilityPlot,

    /// Outcome value of the first and second compared group
    pub group_labels: [Value; 2],
    pub test: TwoSampleTest,
    pub significance_level: f64,
    pub verdict: SignificanceVerdict,
}

impl AnalysisReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        let _ = writeln!(
            report,
            "📋 Dataset '{}': {} records, {} with '{}' present ({} dropped)\n",
            self.dataset,
            self.total_records,
            self.filtered_records,
            self.attribute,
            self.total_records - self.filtered_records
        );

        let _ = writeln!(report, "📊 Summary of '{}':", self.attribute);
        write_summary_header(&mut report);
        write_summary_row(&mut report, "all", &self.summary);

        let _ = writeln!(report, "\n📊 '{}' by '{}':", self.attribute, self.outcome);
        write_summary_header(&mut report);
        for group in &self.by_outcome {
            write_summary_row(&mut report, &group.label(), &group.summary);
        }

        if let Some(hue) = &self.hue {
            if !self.by_outcome_and_hue.is_empty() {
                let _ = writeln!(
                    report,
                    "\n📊 '{}' by '{}' and '{}':",
                    self.attribute, self.outcome, hue
                );
                write_summary_header(&mut report);
                for group in &self.by_outcome_and_hue {
                    write_summary_row(&mut report, &group.label(), &group.summary);
                }
            }
        }

        let _ = writeln!(report, "\n📈 Distribution:");
        let _ = writeln!(
            report,
            "  Histogram: {} bins (square-root rule), width {:.3}",
            self.histogram.bins(),
            bin_width(&self.histogram)
        );
        let _ = writeln!(
            report,
            "  KDE bandwidth: {:.3}, mode ≈ {}",
            self.density.bandwidth,
            fmt_opt(self.density.mode())
        );
        if let Some(log_density) = &self.log_density {
            let _ = writeln!(
                report,
                "  log(1 + {}) KDE bandwidth: {:.3}, mode ≈ {}",
                self.attribute,
                log_density.bandwidth,
                fmt_opt(log_density.mode())
            );
        }

        if let Some(joint) = &self.joint {
            write_joint(&mut report, joint);
        }

        let _ = writeln!(report, "\n🔔 Normality check (z-scores vs. normal quantiles):");
        let _ = writeln!(
            report,
            "  standardized with mean={:.3}, std={:.3}",
            self.standardizer.mean, self.standardizer.std_dev
        );
        let _ = writeln!(
            report,
            "  fit: slope={:.4}, intercept={:.4}, r={:.4}",
            self.normality.slope, self.normality.intercept, self.normality.r
        );

        let _ = writeln!(
            report,
            "\n🧪 Two-sample t-test, {} ({} = {} vs {} = {}):",
            self.test.variance.label(),
            self.outcome,
            self.group_labels[0],
            self.outcome,
            self.group_labels[1]
        );
        let _ = writeln!(
            report,
            "  n = {} / {}, mean = {:.3} / {:.3}, std = {:.3} / {:.3}",
            self.test.first.count,
            self.test.second.count,
            self.test.first.mean,
            self.test.second.mean,
            self.test.first.std_dev,
            self.test.second.std_dev
        );
        let _ = writeln!(
            report,
            "  difference of means: {:.3}",
            self.test.mean_difference()
        );
        let _ = writeln!(
            report,
            "  statistic = {:.4}, df = {:.1}, p-value = {:.4}\n",
            self.test.statistic, self.test.df, self.test.pvalue
        );

        match self.verdict {
            SignificanceVerdict::Significant => {
                let _ = writeln!(
                    report,
                    "✅ SIGNIFICANT at alpha = {} ({}% confidence): reject equal means",
                    self.significance_level,
                    (1.0 - self.significance_level) * 100.0
                );
            }
            SignificanceVerdict::NotSignificant => {
                let _ = writeln!(
                    report,
                    "➖ NOT SIGNIFICANT at alpha = {} ({}% confidence): equal means not rejected",
                    self.significance_level,
                    (1.0 - self.significance_level) * 100.0
                );
            }
        }

        report
    }
}

fn write_summary_header(report: &mut String) {
    let _ = writeln!(
        report,
        "  {:<16} {:>6} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "group", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
}

fn write_summary_row(report: &mut String, label: &str, s: &Summary) {
    let std = s.std.map_or_else(|| "NaN".to_string(), |v| format!("{:.3}", v));
    let _ = writeln!(
        report,
        "  {:<16} {:>6} {:>9.3} {:>9} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
        label, s.count, s.mean, std, s.min, s.q25, s.median, s.q75, s.max
    );
}

fn write_joint(report: &mut String, joint: &JointDistribution) {
    let trim = joint
        .y_max
        .map(|max| format!(", {} < {}", joint.y, max))
        .unwrap_or_default();
    let _ = writeln!(
        report,
        "\n🔗 Joint distribution of '{}' and '{}' ({} pairs{}):",
        joint.x, joint.y, joint.pairs, trim
    );
    let _ = writeln!(
        report,
        "  Pearson r = {}",
        fmt_opt(joint.correlation)
    );

    let hist = &joint.histogram;
    if let Some((row, col)) = hist.densest_cell() {
        let _ = writeln!(
            report,
            "  densest cell of {}x{}: {} in [{:.2}, {:.2}], {} in [{:.2}, {:.2}] with {} pairs",
            hist.x_edges.len() - 1,
            hist.y_edges.len() - 1,
            joint.x,
            hist.x_edges[col],
            hist.x_edges[col + 1],
            joint.y,
            hist.y_edges[row],
            hist.y_edges[row + 1],
            hist.counts[row][col]
        );
    }
}

fn bin_width(hist: &Histogram) -> f32 {
    match (hist.edges.first(), hist.edges.get(1)) {
        (Some(a), Some(b)) => b - a,
        _ => 0.0,
    }
}

fn fmt_opt(value: Option<f32>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}
