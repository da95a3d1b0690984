// Joint distribution of the analysed attribute and a second numeric attribute
//
// The numbers behind a scatter or hexbin plot: the paired values are binned
// on a rectangular grid and summarized with their Pearson correlation. An
// optional upper bound on the second attribute trims a long tail (fares above
// 300) that would otherwise squeeze every other point into one corner.

use crate::analysis::density::{bin_index, equal_width_edges, value_range};
use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Counts of `(x, y)` pairs on an equal-width grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointHistogram {
    pub x_edges: Vec<f32>,
    pub y_edges: Vec<f32>,
    /// `counts[row][col]`, row indexed by y bin and column by x bin
    pub counts: Vec<Vec<usize>>,
}

impl JointHistogram {
    pub fn new(pairs: &[(f32, f32)], x_bins: usize, y_bins: usize) -> Result<Self> {
        if x_bins == 0 || y_bins == 0 {
            return Err(AnalysisError::Config(format!(
                "joint histogram needs at least one bin per axis, got {}x{}",
                x_bins, y_bins
            )));
        }
        if pairs.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "cannot bin an empty set of pairs".to_string(),
            ));
        }
        if let Some((x, y)) = pairs
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(AnalysisError::Statistics(format!(
                "pair ({}, {}) is not finite",
                x, y
            )));
        }

        let (x_lo, x_hi) = value_range(pairs.iter().map(|p| p.0));
        let (y_lo, y_hi) = value_range(pairs.iter().map(|p| p.1));
        let x_edges = equal_width_edges(x_lo, x_hi, x_bins);
        let y_edges = equal_width_edges(y_lo, y_hi, y_bins);

        let mut counts = vec![vec![0usize; x_bins]; y_bins];
        for &(x, y) in pairs {
            counts[bin_index(&y_edges, y)][bin_index(&x_edges, x)] += 1;
        }

        Ok(Self {
            x_edges,
            y_edges,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// `(row, col)` of the most populated cell; the first one wins ties
    pub fn densest_cell(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), usize)> = None;
        for (row, cells) in self.counts.iter().enumerate() {
            for (col, &count) in cells.iter().enumerate() {
                if best.map_or(true, |(_, c)| count > c) {
                    best = Some(((row, col), count));
                }
            }
        }
        best.map(|(cell, _)| cell)
    }
}

/// Pearson correlation of paired values, `None` when either side is constant
pub fn pearson_r(pairs: &[(f32, f32)]) -> Option<f32> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0 as f64).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1 as f64).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x as f64 - mean_x, y as f64 - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()) as f32)
}

/// Paired view of two attributes
#[derive(Debug, Clone, Serialize)]
pub struct JointDistribution {
    pub x: String,
    pub y: String,
    /// Exclusive upper bound applied to `y` before pairing
    pub y_max: Option<f32>,
    /// Records with both attributes present (after trimming)
    pub pairs: usize,
    pub correlation: Option<f32>,
    pub histogram: JointHistogram,
}

/// Pair `x` with `y` over the records where both are present, after dropping
/// records whose `y` is not below `y_max`
pub fn joint_distribution(
    dataset: &Dataset,
    x: &str,
    y: &str,
    y_max: Option<f32>,
    bins: usize,
) -> Result<JointDistribution> {
    let trimmed = match y_max {
        Some(max) => dataset.filter_below(y, max)?,
        None => dataset.clone(),
    };
    let pairs = trimmed.numeric_pairs(x, y)?;
    tracing::debug!(
        x,
        y,
        ?y_max,
        trimmed = dataset.len() - trimmed.len(),
        pairs = pairs.len(),
        "joint distribution"
    );

    let histogram = JointHistogram::new(&pairs, bins, bins)?;
    Ok(JointDistribution {
        x: x.to_string(),
        y: y.to_string(),
        y_max,
        pairs: pairs.len(),
        correlation: pearson_r(&pairs),
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
survived,age,fare
0,22,7.25
1,38,71.28
1,26,7.93
1,35,53.10
0,35,8.05
0,,8.46
0,54,51.86
1,35,512.33
";

    fn sample() -> Dataset {
        Dataset::from_csv_reader("titanic", SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_joint_histogram_counts_every_pair() {
        let pairs = [(0.0, 0.0), (1.0, 0.0), (0.0, 10.0), (1.0, 10.0), (1.0, 9.0)];
        let hist = JointHistogram::new(&pairs, 2, 2).unwrap();

        assert_eq!(hist.x_edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(hist.y_edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(hist.counts, vec![vec![1, 1], vec![1, 2]]);
        assert_eq!(hist.total(), pairs.len());
        assert_eq!(hist.densest_cell(), Some((1, 1)));
    }

    #[test]
    fn test_joint_histogram_errors() {
        assert!(matches!(
            JointHistogram::new(&[(1.0, 1.0)], 0, 3),
            Err(AnalysisError::Config(_))
        ));
        assert!(matches!(
            JointHistogram::new(&[], 3, 3),
            Err(AnalysisError::InsufficientData(_))
        ));
        assert!(matches!(
            JointHistogram::new(&[(1.0, f32::INFINITY)], 3, 3),
            Err(AnalysisError::Statistics(_))
        ));
    }

    #[test]
    fn test_pearson_r() {
        let line = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        assert!((pearson_r(&line).unwrap() - 1.0).abs() < 1e-6);

        let inverse = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        assert!((pearson_r(&inverse).unwrap() + 1.0).abs() < 1e-6);

        assert_eq!(pearson_r(&[(1.0, 5.0), (2.0, 5.0)]), None);
        assert_eq!(pearson_r(&[(1.0, 5.0)]), None);
    }

    #[test]
    fn test_joint_distribution_trims_expensive_fares() {
        let joint = joint_distribution(&sample(), "age", "fare", Some(300.0), 4).unwrap();

        // Missing age and the 512.33 fare are both left out
        assert_eq!(joint.pairs, 6);
        assert_eq!(joint.histogram.total(), 6);
        assert_eq!(joint.histogram.y_edges.last(), Some(&71.28));
        assert!(joint.correlation.is_some());
    }

    #[test]
    fn test_joint_distribution_without_trim() {
        let joint = joint_distribution(&sample(), "age", "fare", None, 4).unwrap();
        assert_eq!(joint.pairs, 7);
        assert_eq!(joint.histogram.y_edges.last(), Some(&512.33));
    }

    #[test]
    fn test_joint_distribution_unknown_attribute() {
        assert_eq!(
            joint_distribution(&sample(), "age", "deck", Some(300.0), 4).unwrap_err(),
            AnalysisError::missing_attribute("deck")
        );
    }
}
