//! Manifest store for `bonsai_brain.bproj`
//!
//! The manifest is a JSON object with two well-known keys:
//!
//! ```json
//! {
//!     "files": ["*.ink", "*.py"],
//!     "training": { "simulator": "custom" }
//! }
//! ```
//!
//! `files` is held as a set while the project is loaded and written back
//! sorted. `training` and any other keys are preserved opaquely.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bonsai_fs::{ConfigStore, Format, NormalizedPath, ProjectPath, io};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "bonsai_brain.bproj";

const FILES_KEY: &str = "files";
const TRAINING_KEY: &str = "training";

/// A loaded project manifest.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    /// Absolute path of the manifest file
    path: NormalizedPath,
    /// The raw document, kept so unknown keys survive a save
    content: Map<String, Value>,
    /// Declared patterns; unique while loaded
    files: BTreeSet<String>,
    /// The `training` object, once present or requested
    training: Option<Map<String, Value>>,
}

impl ProjectFile {
    /// Load a manifest from `path`.
    ///
    /// Any read failure (missing file, permissions) yields an empty
    /// document: "no manifest" is a valid, defaulted state. Malformed JSON
    /// is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = NormalizedPath::new(std::path::absolute(path.as_ref())?);

        let content = match io::read_text_optional(&path) {
            Some(text) => parse_document(&path, &text)?,
            None => Map::new(),
        };
        let files = read_patterns(&path, &content)?;
        let training = match content.get(TRAINING_KEY) {
            Some(Value::Object(section)) => Some(section.clone()),
            Some(_) => {
                tracing::warn!(path = %path, "ignoring non-object training section");
                None
            }
            None => None,
        };

        tracing::debug!(path = %path, patterns = files.len(), "loaded project file");
        Ok(Self {
            path,
            content,
            files,
            training,
        })
    }

    /// Load `file_or_dir` if it is a file, otherwise the default manifest
    /// inside it.
    pub fn from_file_or_dir(file_or_dir: impl AsRef<Path>) -> Result<Self> {
        let file_or_dir = file_or_dir.as_ref();
        if file_or_dir.is_file() {
            Self::load(file_or_dir)
        } else {
            Self::load(file_or_dir.join(ProjectPath::Manifest))
        }
    }

    /// Path of the default manifest in `directory`, if one exists.
    pub fn find(directory: impl AsRef<Path>) -> Option<PathBuf> {
        let path = directory.as_ref().join(ProjectPath::Manifest);
        path.exists().then_some(path)
    }

    /// Absolute path of the manifest file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Directory containing the manifest; the project root.
    pub fn directory(&self) -> NormalizedPath {
        self.path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("/"))
    }

    /// File name of the manifest, e.g. `bonsai_brain.bproj`.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(DEFAULT_MANIFEST)
    }

    /// Whether the manifest exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The declared file patterns.
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    /// Add a pattern. Returns `false` if it was already declared.
    pub fn add_file(&mut self, pattern: impl Into<String>) -> bool {
        self.files.insert(pattern.into())
    }

    /// Remove a pattern. Returns `false` if it was not declared.
    pub fn remove_file(&mut self, pattern: &str) -> bool {
        self.files.remove(pattern)
    }

    /// The `training` section, created empty if missing.
    ///
    /// Reading this section mutates the document: after the call the
    /// `training` key always exists.
    pub fn training(&mut self) -> &mut Map<String, Value> {
        self.training.get_or_insert_with(Map::new)
    }

    /// Apply new-project defaults when the manifest is not yet on disk.
    pub fn apply_defaults(&mut self) {
        if self.exists() {
            return;
        }
        self.files.insert("*.ink".to_string());
        self.files.insert("*.py".to_string());
        self.training()
            .insert("simulator".to_string(), Value::String("custom".to_string()));
    }

    /// The document as it would be written by [`save`](Self::save).
    pub fn document(&self) -> Value {
        let mut output = self.content.clone();
        output.insert(
            FILES_KEY.to_string(),
            Value::Array(self.files.iter().cloned().map(Value::String).collect()),
        );
        if let Some(training) = &self.training {
            output.insert(TRAINING_KEY.to_string(), Value::Object(training.clone()));
        }
        Value::Object(output)
    }

    /// Write the manifest back to disk.
    ///
    /// `files` is written sorted and deduplicated; keys are sorted and
    /// indentation is fixed so diffs stay deterministic.
    pub fn save(&mut self) -> Result<()> {
        let document = self.document();
        if let Value::Object(map) = &document {
            self.content = map.clone();
        }
        ConfigStore::new().save_as(&self.path, &document, Format::Json)?;
        tracing::debug!(path = %self.path, "saved project file");
        Ok(())
    }
}

fn parse_document(path: &NormalizedPath, text: &str) -> Result<Map<String, Value>> {
    let value: Value = ConfigStore::new().parse(path, text, Format::Json)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidManifest {
            path: path.to_native(),
            message: "expected a JSON object".to_string(),
        }),
    }
}

fn read_patterns(path: &NormalizedPath, content: &Map<String, Value>) -> Result<BTreeSet<String>> {
    let Some(files) = content.get(FILES_KEY) else {
        return Ok(BTreeSet::new());
    };

    let invalid = || Error::InvalidManifest {
        path: path.to_native(),
        message: "\"files\" must be an array of strings".to_string(),
    };

    files
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}
