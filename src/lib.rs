//! passenger-eda - Exploratory analysis of passenger survival data
//!
//! This library loads a passenger-level dataset, filters out records without a
//! value for a continuous attribute, describes it overall and per outcome group,
//! standardizes it, checks it against a normal reference, and compares the two
//! outcome groups with a two-sample t-test.

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;

pub use error::{AnalysisError, Result};
