//! Named-dataset providers

use super::Dataset;
use crate::error::{AnalysisError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Something that can produce a dataset given its name
pub trait DatasetSource {
    /// Load the named dataset, failing with `AnalysisError::Load` if unavailable
    fn load(&self, name: &str) -> Result<Dataset>;
}

/// Resolves dataset names to `<root>/<name>.csv`
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a dataset name resolves to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.csv", name))
    }
}

impl DatasetSource for CsvDirectorySource {
    fn load(&self, name: &str) -> Result<Dataset> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(AnalysisError::Load(format!(
                "invalid dataset name '{}'",
                name
            )));
        }

        let path = self.path_for(name);
        let file = File::open(&path)
            .map_err(|e| AnalysisError::Load(format!("{}: {}", path.display(), e)))?;

        let dataset = Dataset::from_csv_reader(name, file)?;
        tracing::info!(
            dataset = name,
            path = %path.display(),
            records = dataset.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("titanic.csv"), "age,survived\n22,0\n,1\n").unwrap();

        let source = CsvDirectorySource::new(dir.path());
        let ds = source.load("titanic").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.name(), "titanic");
    }

    #[test]
    fn test_missing_dataset_is_load_error() {
        let dir = TempDir::new().unwrap();
        let source = CsvDirectorySource::new(dir.path());
        assert!(matches!(
            source.load("titanic"),
            Err(AnalysisError::Load(_))
        ));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let source = CsvDirectorySource::new(".");
        assert!(matches!(
            source.load("../etc/passwd"),
            Err(AnalysisError::Load(_))
        ));
    }
}
