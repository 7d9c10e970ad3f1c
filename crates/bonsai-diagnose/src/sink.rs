//! Saved query results
//!
//! Each diaglet writes what it found to
//! `<log root>/<run name>/<Diaglet>_<concept>.json` so the raw data can be
//! attached to a support request.

use std::path::{Path, PathBuf};

use bonsai_fs::{NormalizedPath, io, to_json_pretty};
use serde::Serialize;

use crate::config::{DiagnoseConfig, ensure_dir};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
    concept: String,
}

impl ResultSink {
    /// Sink for the run described by `config`; creates the run directory.
    pub fn create(config: &DiagnoseConfig) -> Result<Self> {
        Self::create_in(config.run_dir(), &config.concept_name)
    }

    pub fn create_in(dir: impl AsRef<Path>, concept: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure_dir(&dir)?;
        tracing::debug!(dir = %dir.display(), "saving diagnostic results");
        Ok(Self {
            dir,
            concept: concept.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a diaglet's results are saved to.
    pub fn path_for(&self, diaglet: &str) -> PathBuf {
        self.dir.join(format!("{diaglet}_{}.json", self.concept))
    }

    /// Write `value` as the results of `diaglet`.
    pub fn save<T: Serialize>(&self, diaglet: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(diaglet);
        let text = to_json_pretty(value).map_err(Error::Json)?;
        io::write_text(&NormalizedPath::new(&path), &text)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn results_are_named_after_diaglet_and_concept() {
        let root = TempDir::new().unwrap();
        let sink = ResultSink::create_in(root.path().join("run1"), "Balance").unwrap();
        let path = sink.save("ErrorsDiaglet", &json!({"rows": []})).unwrap();

        assert_eq!(path, root.path().join("run1").join("ErrorsDiaglet_Balance.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"rows\": []\n}");
    }
}
