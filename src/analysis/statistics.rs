// Two-sample comparison of means
//
// Compares a continuous attribute across the two outcome groups.
//
// - Pooled (Student) t-test by default: the groups' standard deviations are
//   close, so the equal-variance form is the reference behavior
// - Welch's unequal-variance variant is available through VarianceAssumption
// - t and df come from f64 moments; the two-tailed p-value from statrs'
//   Student t distribution
// - Normality of the attribute is assumed, not checked (see normality.rs)

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Which t-test formula to use for the standard error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceAssumption {
    /// Equal variances, pooled estimate (Student's t-test)
    #[default]
    Pooled,
    /// Unequal variances (Welch's t-test)
    Welch,
}

impl VarianceAssumption {
    pub fn label(self) -> &'static str {
        match self {
            VarianceAssumption::Pooled => "pooled variance (Student)",
            VarianceAssumption::Welch => "unequal variance (Welch)",
        }
    }
}

/// Count, mean and sample standard deviation of one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleMoments {
    pub count: usize,
    pub mean: f32,
    /// Sample standard deviation (n − 1 denominator)
    pub std_dev: f32,
}

impl SampleMoments {
    /// Compute moments of a sample with at least two values
    pub fn of(values: &[f32]) -> Result<Self> {
        if values.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "need at least 2 values for a standard deviation, got {}",
                values.len()
            )));
        }

        let (mean, variance) = mean_and_variance(values)?;
        let moments = Self {
            count: values.len(),
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
        };
        if !moments.mean.is_finite() || !moments.std_dev.is_finite() {
            return Err(AnalysisError::Statistics(format!(
                "moments overflow f32 (mean={}, std={})",
                mean,
                variance.sqrt()
            )));
        }
        Ok(moments)
    }

    /// Whether every value in the sample is the same
    ///
    /// The two-pass f64 computation is exact for constant f32 input, so the
    /// spread is zero exactly then and nonzero for any distinct values.
    pub fn is_constant(&self) -> bool {
        self.std_dev == 0.0
    }
}

/// Reject NaN and infinite values before they reach a statistic
pub(crate) fn ensure_finite(values: &[f32]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(AnalysisError::Statistics(format!(
            "value {} at position {} is not finite",
            values[i], i
        ))),
        None => Ok(()),
    }
}

/// Mean and sample variance (n − 1 denominator), in f64
///
/// Two passes: a single-pass f32 variance loses the spread of near-constant
/// samples and can invent spread for constant ones.
fn mean_and_variance(values: &[f32]) -> Result<(f64, f64)> {
    ensure_finite(values)?;
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    Ok((mean, sum_sq / (n - 1.0)))
}

/// Two-tailed p-value of a t statistic: `2 · (1 − F(|t|))` under Student's t
/// with `df` degrees of freedom
pub fn two_tailed_pvalue(statistic: f64, df: f64) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        AnalysisError::Statistics(format!("Student t with {} degrees of freedom: {}", df, e))
    })?;
    Ok((2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0))
}

/// Result of comparing the means of two independent samples
#[derive(Debug, Clone, Serialize)]
pub struct TwoSampleTest {
    /// t-statistic; positive when the first sample's mean is larger
    pub statistic: f32,

    /// Two-tailed p-value under H0: the two means are equal
    pub pvalue: f32,

    /// Degrees of freedom
    pub df: f32,

    /// Formula used for the standard error
    pub variance: VarianceAssumption,

    pub first: SampleMoments,
    pub second: SampleMoments,
}

impl TwoSampleTest {
    /// Difference of means, first minus second
    pub fn mean_difference(&self) -> f32 {
        self.first.mean - self.second.mean
    }

    pub fn is_significant(&self, significance_level: f64) -> bool {
        (self.pvalue as f64) < significance_level
    }
}

/// Compare two independent samples with a two-tailed t-test
///
/// `variance` selects the pooled (Student) or Welch formula for the standard
/// error and degrees of freedom.
///
/// # Errors
/// - `InsufficientData` if either sample has fewer than 2 values
/// - `DegenerateDistribution` if both samples are constant (t is undefined)
/// - `Statistics` if a sample holds a non-finite value
///
/// # Example
/// ```
/// use passenger_eda::analysis::{compare_means, VarianceAssumption};
///
/// let died = vec![30.0, 34.0, 29.0, 41.0, 33.0, 36.0];
/// let survived = vec![12.0, 15.0, 11.0, 14.0, 10.0, 13.0];
///
/// let result = compare_means(&died, &survived, VarianceAssumption::Pooled).unwrap();
/// assert!(result.statistic > 0.0);
/// assert!(result.pvalue < 0.05);
/// ```
pub fn compare_means(
    first: &[f32],
    second: &[f32],
    variance: VarianceAssumption,
) -> Result<TwoSampleTest> {
    if first.len() < 2 || second.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least 2 values per group for a t-test, got {} and {}",
            first.len(),
            second.len()
        )));
    }

    let first_moments = SampleMoments::of(first)?;
    let second_moments = SampleMoments::of(second)?;

    if first_moments.is_constant() && second_moments.is_constant() {
        return Err(AnalysisError::DegenerateDistribution(
            "both groups are constant, the t-statistic is undefined".to_string(),
        ));
    }

    let (mean_a, var_a) = mean_and_variance(first)?;
    let (mean_b, var_b) = mean_and_variance(second)?;
    let (n_a, n_b) = (first.len() as f64, second.len() as f64);

    let (std_err, df) = match variance {
        VarianceAssumption::Pooled => {
            let df = n_a + n_b - 2.0;
            let pooled = ((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / df;
            ((pooled * (1.0 / n_a + 1.0 / n_b)).sqrt(), df)
        }
        VarianceAssumption::Welch => {
            let (va, vb) = (var_a / n_a, var_b / n_b);
            // Welch-Satterthwaite
            let df = (va + vb).powi(2) / (va * va / (n_a - 1.0) + vb * vb / (n_b - 1.0));
            ((va + vb).sqrt(), df)
        }
    };

    let statistic = (mean_a - mean_b) / std_err;
    if !statistic.is_finite() || !df.is_finite() {
        return Err(AnalysisError::Statistics(format!(
            "t-test produced a non-finite result (t={}, df={})",
            statistic, df
        )));
    }
    let pvalue = two_tailed_pvalue(statistic, df)?;

    tracing::debug!(
        statistic,
        pvalue,
        df,
        variance = variance.label(),
        "compared means"
    );

    Ok(TwoSampleTest {
        statistic: statistic as f32,
        pvalue: pvalue as f32,
        df: df as f32,
        variance,
        first: first_moments,
        second: second_moments,
    })
}
