//! Tabular passenger dataset
//!
//! A `Dataset` is loaded once and never mutated. Every operation borrows it and
//! returns a new value, so derived subsets (the presence-filtered subset, the
//! outcome groups) can be handed to later steps without any shared state.

mod source;

pub use source::{CsvDirectorySource, DatasetSource};

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;

/// A single cell value
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value (empty cell, `NaN`, `NA`)
    Missing,
    Number(f32),
    Text(String),
}

impl Value {
    /// Parse a raw CSV cell
    ///
    /// Empty cells and the usual not-a-number spellings become `Missing`, as
    /// do infinities and literals that overflow f32 (`inf`, `1e39`).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || matches!(trimmed, "NaN" | "nan" | "NA" | "N/A") {
            return Value::Missing;
        }
        match trimmed.parse::<f32>() {
            Ok(n) if !n.is_finite() => Value::Missing,
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Number(_) => 0,
            Value::Text(_) => 1,
            Value::Missing => 2,
        }
    }

    /// Total order used for grouping: numbers, then text, then missing
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "NaN"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the dataset, aligned with its schema
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Ordered attribute names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<String>,
}

impl Schema {
    pub fn new(attributes: Vec<String>) -> Self {
        Self { attributes }
    }

    /// Position of an attribute, or `AnalysisError::Data` if absent
    pub fn index_of(&self, attribute: &str) -> Result<usize> {
        self.attributes
            .iter()
            .position(|a| a == attribute)
            .ok_or_else(|| AnalysisError::missing_attribute(attribute))
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// An immutable, ordered collection of records
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, rejecting records whose width disagrees with the schema
    pub fn new(name: impl Into<String>, schema: Schema, records: Vec<Record>) -> Result<Self> {
        let name = name.into();
        if let Some((row, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != schema.len())
        {
            return Err(AnalysisError::Load(format!(
                "{}: record {} has {} fields, schema has {}",
                name,
                row,
                record.values.len(),
                schema.len()
            )));
        }
        Ok(Self {
            name,
            schema,
            records,
        })
    }

    /// Parse a CSV document whose header row names the attributes
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let schema = Schema::new(csv_reader.headers()?.iter().map(str::to_string).collect());
        if schema.is_empty() {
            return Err(AnalysisError::Load(format!("{}: empty header row", name)));
        }

        let records = csv_reader
            .records()
            .map(|row| row.map(|r| Record::new(r.iter().map(Value::parse).collect())))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(
            dataset = %name,
            attributes = schema.len(),
            records = records.len(),
            "parsed CSV dataset"
        );

        Self::new(name, schema, records)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only records whose attribute holds a number
    ///
    /// Order among the retained records is preserved and `self` is untouched.
    /// Text in a numeric column counts as absent.
    pub fn filter_present(&self, attribute: &str) -> Result<Dataset> {
        let index = self.schema.index_of(attribute)?;
        Ok(self.retain(|r| matches!(r.get(index), Some(Value::Number(_)))))
    }

    /// Keep only records whose attribute is a number strictly below `threshold`
    ///
    /// Missing and text values fail the comparison and are dropped.
    pub fn filter_below(&self, attribute: &str, threshold: f32) -> Result<Dataset> {
        let index = self.schema.index_of(attribute)?;
        Ok(self.retain(|r| {
            r.get(index)
                .and_then(Value::as_number)
                .is_some_and(|v| v < threshold)
        }))
    }

    /// Records for which `predicate` holds, in order
    pub(crate) fn retain(&self, predicate: impl Fn(&Record) -> bool) -> Dataset {
        Dataset {
            name: self.name.clone(),
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Present numeric values of an attribute, in record order
    pub fn numeric_values(&self, attribute: &str) -> Result<Vec<f32>> {
        let index = self.schema.index_of(attribute)?;
        Ok(self
            .records
            .iter()
            .filter_map(|r| r.get(index).and_then(Value::as_number))
            .collect())
    }

    /// `(x, y)` for every record where both attributes hold numbers
    pub fn numeric_pairs(&self, x: &str, y: &str) -> Result<Vec<(f32, f32)>> {
        let (xi, yi) = (self.schema.index_of(x)?, self.schema.index_of(y)?);
        Ok(self
            .records
            .iter()
            .filter_map(|r| {
                let x = r.get(xi).and_then(Value::as_number)?;
                let y = r.get(yi).and_then(Value::as_number)?;
                Some((x, y))
            })
            .collect())
    }

    /// Every value of an attribute, in record order
    pub fn column(&self, attribute: &str) -> Result<Vec<&Value>> {
        let index = self.schema.index_of(attribute)?;
        Ok(self.records.iter().filter_map(|r| r.get(index)).collect())
    }
}
