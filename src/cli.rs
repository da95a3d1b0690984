//! CLI argument parsing for passenger-eda

use crate::analysis::{AnalysisConfig, VarianceAssumption};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "passenger-eda")]
#[command(version)]
#[command(
    about = "Compare a passenger attribute across survival outcomes with a two-sample t-test",
    long_about = None
)]
pub struct Cli {
    /// Directory holding `<dataset>.csv` files
    #[arg(short = 'd', long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Dataset name (overrides the config file)
    #[arg(long = "dataset", value_name = "NAME")]
    pub dataset: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Continuous attribute to analyse (e.g. age)
    #[arg(short = 'a', long = "attribute", value_name = "NAME")]
    pub attribute: Option<String>,

    /// Binary outcome attribute (e.g. survived)
    #[arg(short = 'o', long = "outcome", value_name = "NAME")]
    pub outcome: Option<String>,

    /// Secondary grouping attribute for the breakdown table (e.g. class)
    #[arg(long = "hue", value_name = "NAME", conflicts_with = "no_hue")]
    pub hue: Option<String>,

    /// Skip the secondary grouping breakdown
    #[arg(long = "no-hue")]
    pub no_hue: bool,

    /// Second attribute for the joint distribution (e.g. fare)
    #[arg(long = "joint", value_name = "NAME", conflicts_with = "no_joint")]
    pub joint: Option<String>,

    /// Skip the joint distribution
    #[arg(long = "no-joint")]
    pub no_joint: bool,

    /// Trim records whose joint attribute is not below this value
    #[arg(long = "joint-max", value_name = "VALUE")]
    pub joint_max: Option<f32>,

    /// Use Welch's unequal-variance t-test instead of the pooled test
    #[arg(long = "welch")]
    pub welch: bool,

    /// Significance level for the test
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output (stderr)
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Build the analysis configuration: file (or defaults), then flags on top
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(attribute) = &self.attribute {
            config.attribute = attribute.clone();
        }
        if let Some(outcome) = &self.outcome {
            config.outcome = outcome.clone();
        }
        if self.no_hue {
            config.hue = None;
        } else if let Some(hue) = &self.hue {
            config.hue = Some(hue.clone());
        }
        if self.no_joint {
            config.joint = None;
        } else if let Some(joint) = &self.joint {
            config.joint = Some(joint.clone());
        }
        if let Some(max) = self.joint_max {
            config.joint_max = Some(max);
        }
        if self.welch {
            config.variance = VarianceAssumption::Welch;
        }
        if let Some(alpha) = self.alpha {
            config.significance_level = alpha;
        }

        config.validate()?;
        Ok(config)
    }
}
