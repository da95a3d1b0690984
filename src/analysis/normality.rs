// Normal probability plot diagnostic
//
// The t-test assumes the attribute is roughly normal within each group. That
// assumption is not enforced; instead the ordered sample is paired with the
// quantiles a normal distribution would produce, and a least-squares line is
// fitted through the pairs. A correlation `r` close to 1 means the points lie
// on a straight line, i.e. the sample looks normal.
//
// Theoretical quantiles follow Filliben's order-statistic medians:
//   m(n) = 0.5^(1/n), m(1) = 1 - m(n), m(i) = (i - 0.3175) / (n + 0.365)

use crate::analysis::statistics::ensure_finite;
use crate::error::{AnalysisError, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Ordered sample against standard normal quantiles, plus the fitted line
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityPlot {
    /// Standard normal quantiles (x axis)
    pub theoretical: Vec<f32>,
    /// Sorted sample values (y axis)
    pub ordered: Vec<f32>,
    pub slope: f32,
    pub intercept: f32,
    /// Pearson correlation between the two axes
    pub r: f32,
}

impl ProbabilityPlot {
    /// Build the plot data for a sample of at least two values
    pub fn against_normal(values: &[f32]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "a probability plot needs at least 2 values, got {}",
                n
            )));
        }

        ensure_finite(values)?;

        let mut ordered = values.to_vec();
        ordered.sort_by(|a, b| a.total_cmp(b));

        let theoretical = order_statistic_medians(n)
            .into_iter()
            .map(normal_quantile)
            .collect::<Result<Vec<f64>>>()?;

        let xs = &theoretical;
        let ys: Vec<f64> = ordered.iter().map(|&v| v as f64).collect();
        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(&ys) {
            let (dx, dy) = (x - mean_x, y - mean_y);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        if syy == 0.0 {
            return Err(AnalysisError::DegenerateDistribution(
                "cannot fit a probability plot to a constant sample".to_string(),
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r = sxy / (sxx * syy).sqrt();

        Ok(Self {
            theoretical: theoretical.iter().map(|&x| x as f32).collect(),
            ordered,
            slope: slope as f32,
            intercept: intercept as f32,
            r: r as f32,
        })
    }
}

/// Filliben's estimate of the uniform order-statistic medians
fn order_statistic_medians(n: usize) -> Vec<f64> {
    let nf = n as f64;
    let last = 0.5_f64.powf(1.0 / nf);
    (1..=n)
        .map(|i| {
            if i == 1 {
                1.0 - last
            } else if i == n {
                last
            } else {
                (i as f64 - 0.3175) / (nf + 0.365)
            }
        })
        .collect()
}

/// Standard normal quantile function (inverse CDF) for p in (0, 1)
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(AnalysisError::Statistics(format!(
            "normal quantile needs a probability in (0, 1), got {}",
            p
        )));
    }
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| AnalysisError::Statistics(format!("standard normal: {}", e)))?;
    Ok(standard.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile_known_values() {
        assert!(normal_quantile(0.5).unwrap().abs() < 1e-9);
        assert!((normal_quantile(0.975).unwrap() - 1.959_963_985).abs() < 1e-7);
        assert!((normal_quantile(0.025).unwrap() + 1.959_963_985).abs() < 1e-7);
        assert!((normal_quantile(0.001).unwrap() + 3.090_232_306).abs() < 1e-6);
        assert!((normal_quantile(0.841_344_746).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_quantile_outside_unit_interval() {
        for p in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            assert!(matches!(
                normal_quantile(p),
                Err(AnalysisError::Statistics(_))
            ));
        }
    }

    #[test]
    fn test_order_statistic_medians_symmetric() {
        let m = order_statistic_medians(5);
        assert_eq!(m.len(), 5);
        for i in 0..5 {
            assert!((m[i] + m[4 - i] - 1.0).abs() < 1e-12);
        }
        assert!((m[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probability_plot_of_normal_quantiles_is_straight() {
        // Values placed exactly at normal quantiles: a perfect line
        let values: Vec<f32> = order_statistic_medians(50)
            .into_iter()
            .map(|p| (10.0 + 2.0 * normal_quantile(p).unwrap()) as f32)
            .collect();
        let plot = ProbabilityPlot::against_normal(&values).unwrap();

        assert!((plot.r - 1.0).abs() < 1e-5);
        assert!((plot.slope - 2.0).abs() < 1e-3);
        assert!((plot.intercept - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_probability_plot_sorts_sample() {
        let plot = ProbabilityPlot::against_normal(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(plot.ordered, vec![1.0, 2.0, 3.0]);
        assert!(plot.theoretical[0] < 0.0 && plot.theoretical[2] > 0.0);
    }

    #[test]
    fn test_skewed_sample_has_lower_r() {
        let skewed: Vec<f32> = (1..=40).map(|i| (i as f32).powi(4)).collect();
        let plot = ProbabilityPlot::against_normal(&skewed).unwrap();
        assert!(plot.r < 0.95);
    }

    #[test]
    fn test_probability_plot_errors() {
        assert!(matches!(
            ProbabilityPlot::against_normal(&[1.0]),
            Err(AnalysisError::InsufficientData(_))
        ));
        assert!(matches!(
            ProbabilityPlot::against_normal(&[4.0, 4.0, 4.0]),
            Err(AnalysisError::DegenerateDistribution(_))
        ));
        assert!(matches!(
            ProbabilityPlot::against_normal(&[1.0, f32::INFINITY]),
            Err(AnalysisError::Statistics(_))
        ));
    }
}
