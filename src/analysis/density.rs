// Distribution shape: histograms and Gaussian kernel density estimates
//
// These produce the numbers a distribution plot is drawn from. Rendering is
// left to whoever consumes the report.

use crate::analysis::statistics::{ensure_finite, SampleMoments};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Number of histogram bins by the square-root rule: `floor(sqrt(n))`, at least 1
///
/// A reasonable first choice when the sample is not tiny and not too far from
/// normal.
pub fn sqrt_rule_bins(n: usize) -> usize {
    ((n as f64).sqrt().floor() as usize).max(1)
}

/// `ln(x + 1)` of every value
pub fn log1p_transform(values: &[f32]) -> Vec<f32> {
    values.iter().map(|v| v.ln_1p()).collect()
}

/// Min and max of the values, widened to a unit range centred on the value
/// when they coincide
pub(crate) fn value_range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// `bins + 1` evenly spaced edges from `lo` to `hi`
pub(crate) fn equal_width_edges(lo: f32, hi: f32, bins: usize) -> Vec<f32> {
    let width = (hi - lo) / bins as f32;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f32 })
        .collect()
}

/// Bin of `value` within `edges`; the last bin is closed on the right
pub(crate) fn bin_index(edges: &[f32], value: f32) -> usize {
    let bins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[bins]);
    let width = (hi - lo) / bins as f32;
    (((value - lo) / width).floor().max(0.0) as usize).min(bins - 1)
}

/// Equal-width histogram over the sample range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` edges; the last bin is closed on the right
    pub edges: Vec<f32>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f32], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(AnalysisError::Config(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "cannot bin an empty sample".to_string(),
            ));
        }
        ensure_finite(values)?;

        let (lo, hi) = value_range(values.iter().copied());
        let edges = equal_width_edges(lo, hi, bins);

        let mut counts = vec![0usize; bins];
        for &v in values {
            counts[bin_index(&edges, v)] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Square-root rule histogram
    pub fn sqrt_rule(values: &[f32]) -> Result<Self> {
        Self::new(values, sqrt_rule_bins(values.len()))
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Kernel bandwidth selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// Scott's rule: σ · n^(−1/5)
    Scott,
    /// Fixed multiple of the sample standard deviation
    Factor(f32),
}

impl Bandwidth {
    pub fn validate(&self) -> Result<()> {
        match self {
            Bandwidth::Scott => Ok(()),
            Bandwidth::Factor(f) if *f > 0.0 && f.is_finite() => Ok(()),
            Bandwidth::Factor(f) => Err(AnalysisError::Config(format!(
                "bandwidth factor must be positive, got {}",
                f
            ))),
        }
    }

    fn factor(&self, n: usize) -> f64 {
        match self {
            Bandwidth::Scott => (n as f64).powf(-0.2),
            Bandwidth::Factor(f) => *f as f64,
        }
    }
}

/// Density evaluated on an evenly spaced grid
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    pub bandwidth: f32,
    pub grid: Vec<f32>,
    pub density: Vec<f32>,
}

impl DensityCurve {
    /// Grid point with the highest density
    pub fn mode(&self) -> Option<f32> {
        self.grid
            .iter()
            .zip(&self.density)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(x, _)| *x)
    }
}

/// Gaussian kernel density estimate
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit to a sample of at least two values with nonzero spread
    pub fn fit(values: &[f32], bandwidth: Bandwidth) -> Result<Self> {
        bandwidth.validate()?;
        let moments = SampleMoments::of(values)?;
        if moments.is_constant() {
            return Err(AnalysisError::DegenerateDistribution(
                "kernel bandwidth is zero for a constant sample".to_string(),
            ));
        }

        let h = moments.std_dev as f64 * bandwidth.factor(values.len());
        Ok(Self {
            samples: values.iter().map(|&v| v as f64).collect(),
            bandwidth: h,
        })
    }

    /// Kernel standard deviation
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth as f32
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let x = x as f64;
        let h = self.bandwidth;
        let norm = (self.samples.len() as f64) * h * (2.0 * std::f64::consts::PI).sqrt();
        let sum: f64 = self
            .samples
            .iter()
            .map(|s| {
                let u = (x - s) / h;
                (-0.5 * u * u).exp()
            })
            .sum();
        (sum / norm) as f32
    }

    /// Evaluate on `points` grid values spanning the data range, extended by
    /// `cut` bandwidths on each side
    pub fn curve(&self, points: usize, cut: f32) -> Result<DensityCurve> {
        if points < 2 {
            return Err(AnalysisError::Config(format!(
                "density grid needs at least 2 points, got {}",
                points
            )));
        }

        let (lo, hi) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let pad = cut as f64 * self.bandwidth;
        let (start, end) = (lo - pad, hi + pad);
        let step = (end - start) / (points - 1) as f64;

        let grid: Vec<f32> = (0..points)
            .map(|i| (start + step * i as f64) as f32)
            .collect();
        let density = grid.iter().map(|&x| self.evaluate(x)).collect();

        Ok(DensityCurve {
            bandwidth: self.bandwidth(),
            grid,
            density,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_rule_bins() {
        assert_eq!(sqrt_rule_bins(0), 1);
        assert_eq!(sqrt_rule_bins(1), 1);
        assert_eq!(sqrt_rule_bins(714), 26);
        assert_eq!(sqrt_rule_bins(900), 30);
    }

    #[test]
    fn test_log1p_transform() {
        let out = log1p_transform(&[0.0, std::f32::consts::E - 1.0]);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let hist = Histogram::new(&values, 5).unwrap();

        assert_eq!(hist.bins(), 5);
        assert_eq!(hist.edges.len(), 6);
        assert_eq!(hist.edges[0], 0.0);
        assert_eq!(hist.edges[5], 10.0);
        assert_eq!(hist.counts, vec![2, 2, 2, 2, 2]);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn test_histogram_constant_sample() {
        let hist = Histogram::new(&[3.0, 3.0, 3.0], 2).unwrap();
        assert_eq!(hist.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(hist.counts, vec![0, 3]);
    }

    #[test]
    fn test_histogram_errors() {
        assert!(matches!(
            Histogram::new(&[1.0], 0),
            Err(AnalysisError::Config(_))
        ));
        assert!(matches!(
            Histogram::new(&[], 3),
            Err(AnalysisError::InsufficientData(_))
        ));
        assert!(matches!(
            Histogram::new(&[1.0, f32::INFINITY], 3),
            Err(AnalysisError::Statistics(_))
        ));
    }

    #[test]
    fn test_sqrt_rule_histogram() {
        let values: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let hist = Histogram::sqrt_rule(&values).unwrap();
        assert_eq!(hist.bins(), 10);
        assert!(hist.counts.iter().all(|&c| c == 10));
    }

    #[test]
    fn test_scott_bandwidth() {
        // std of 1..=5 is sqrt(2.5); Scott factor 5^(-1/5)
        let kde = GaussianKde::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], Bandwidth::Scott).unwrap();
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);
        assert!((kde.bandwidth() as f64 - expected).abs() < 1e-5);
    }

    #[test]
    fn test_factor_bandwidth() {
        let kde = GaussianKde::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], Bandwidth::Factor(0.25)).unwrap();
        let expected = 2.5_f64.sqrt() * 0.25;
        assert!((kde.bandwidth() as f64 - expected).abs() < 1e-5);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values = [22.0, 38.0, 26.0, 35.0, 35.0, 54.0, 2.0, 27.0, 14.0, 4.0, 58.0, 20.0];
        let kde = GaussianKde::fit(&values, Bandwidth::Scott).unwrap();
        let curve = kde.curve(400, 4.0).unwrap();

        let step = (curve.grid[1] - curve.grid[0]) as f64;
        let area: f64 = curve.density.iter().map(|&d| d as f64 * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area {}", area);
    }

    #[test]
    fn test_density_curve_mode_near_cluster() {
        let values = [1.0, 1.1, 0.9, 1.05, 0.95, 8.0];
        let kde = GaussianKde::fit(&values, Bandwidth::Factor(0.1)).unwrap();
        let curve = kde.curve(200, 3.0).unwrap();
        let mode = curve.mode().unwrap();
        assert!((mode - 1.0).abs() < 0.2, "mode {}", mode);
    }

    #[test]
    fn test_kde_large_offset_sample() {
        let kde = GaussianKde::fit(&[1e6, 1e6 + 0.5, 1e6, 1e6 + 0.5], Bandwidth::Scott).unwrap();
        assert!(kde.bandwidth() > 0.0);
        assert!(kde.evaluate(1e6 + 0.25) > 0.0);
    }

    #[test]
    fn test_kde_errors() {
        assert!(matches!(
            GaussianKde::fit(&[1.0], Bandwidth::Scott),
            Err(AnalysisError::InsufficientData(_))
        ));
        assert!(matches!(
            GaussianKde::fit(&[2.0, 2.0], Bandwidth::Scott),
            Err(AnalysisError::DegenerateDistribution(_))
        ));
        assert!(matches!(
            GaussianKde::fit(&[1.0, 2.0], Bandwidth::Factor(0.0)),
            Err(AnalysisError::Config(_))
        ));
        let kde = GaussianKde::fit(&[1.0, 2.0], Bandwidth::Scott).unwrap();
        assert!(matches!(kde.curve(1, 3.0), Err(AnalysisError::Config(_))));
    }
}
