//! [`TestProject`] builder for Bonsai project test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Default manifest file name, duplicated here to keep this crate a leaf.
pub const MANIFEST_NAME: &str = "bonsai_brain.bproj";

/// A temporary project directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use bonsai_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_file("cartpole.ink", "schema State end");
/// project.write_manifest(&["*.ink"]);
/// project.assert_file_exists("bonsai_brain.bproj");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of the manifest inside this project.
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(MANIFEST_NAME)
    }

    /// Write `content` to `rel` (relative to root), creating parent dirs.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        self.write_bytes(rel, content.as_bytes())
    }

    /// Write raw bytes to `rel`, creating parent dirs.
    pub fn write_bytes(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a file of exactly `size` bytes.
    pub fn write_sized(&self, rel: &str, size: usize) -> PathBuf {
        self.write_bytes(rel, &vec![b'x'; size])
    }

    /// Create an (empty) directory at `rel`.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a manifest declaring `patterns` and a custom simulator.
    pub fn write_manifest(&self, patterns: &[&str]) -> PathBuf {
        self.write_manifest_json(&serde_json::json!({
            "files": patterns,
            "training": { "simulator": "custom" },
        }))
    }

    /// Write an arbitrary JSON document as the manifest.
    pub fn write_manifest_json(&self, document: &Value) -> PathBuf {
        let text = serde_json::to_string_pretty(document).unwrap();
        self.write_file(MANIFEST_NAME, &text)
    }

    /// Read and parse the manifest from disk.
    pub fn read_manifest(&self) -> Value {
        let text = fs::read_to_string(self.manifest_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
