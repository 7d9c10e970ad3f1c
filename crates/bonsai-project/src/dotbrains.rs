//! The `.brains` file: which remote brains a project directory is bound to
//!
//! ```json
//! {"brains": [{"name": "cartpole", "default": true}]}
//! ```
//!
//! At most one entry is the default. Every mutation is written straight
//! back to disk.

use std::path::Path;

use bonsai_fs::{ConfigStore, Format, NormalizedPath, ProjectPath, io};
use serde::{Deserialize, Serialize};

use crate::{Error, ProjectFile, Result};

fn default_brain_name() -> String {
    "brain".to_string()
}

/// A named reference to a remote brain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainRef {
    #[serde(default = "default_brain_name")]
    pub name: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DotBrainsDocument {
    #[serde(default)]
    brains: Vec<BrainRef>,
}

/// The brain references stored in a directory's `.brains` file.
#[derive(Debug)]
pub struct DotBrains {
    path: NormalizedPath,
    brains: Vec<BrainRef>,
}

impl DotBrains {
    /// Load `.brains` from `directory`. A missing file is an empty set;
    /// malformed JSON is an error.
    pub fn load(directory: impl AsRef<Path>) -> Result<Self> {
        let path = NormalizedPath::new(directory.as_ref().join(ProjectPath::DotBrains));
        let document: DotBrainsDocument = match io::read_text_optional(&path) {
            Some(text) => ConfigStore::new().parse(&path, &text, Format::Json)?,
            None => DotBrainsDocument::default(),
        };
        Ok(Self {
            path,
            brains: document.brains,
        })
    }

    /// Path of the `.brains` file, whether or not it exists yet.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn brains(&self) -> &[BrainRef] {
        &self.brains
    }

    pub fn find(&self, name: &str) -> Option<&BrainRef> {
        self.brains.iter().find(|b| b.name == name)
    }

    /// The brain currently flagged as default.
    pub fn default_brain(&self) -> Option<&BrainRef> {
        self.brains.iter().find(|b| b.default)
    }

    /// Append a reference to `name` and make it the default.
    pub fn add(&mut self, name: &str) -> Result<()> {
        self.brains.push(BrainRef {
            name: name.to_string(),
            default: false,
        });
        self.set_default(name)
    }

    /// Make `name` the only default brain.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if self.find(name).is_none() {
            return Err(Error::BrainNotFound {
                name: name.to_string(),
                path: self.path.to_native(),
            });
        }
        for brain in &mut self.brains {
            brain.default = brain.name == name;
        }
        self.write()
    }

    /// Make `name` the default, adding it first if it is not listed.
    pub fn add_or_set_default(&mut self, name: &str) -> Result<()> {
        if self.find(name).is_some() {
            self.set_default(name)
        } else {
            self.add(name)
        }
    }

    fn write(&self) -> Result<()> {
        let document = DotBrainsDocument {
            brains: self.brains.clone(),
        };
        ConfigStore::new().save_as(&self.path, &document, Format::Json)?;
        tracing::debug!(path = %self.path, "updated brain references");
        Ok(())
    }
}

/// Decide which brain a command targets.
///
/// An explicit name wins. With a `--project` directory its default brain is
/// used and `cwd` is never consulted; without one, the default of `cwd`.
pub fn resolve_brain_name(explicit: Option<&str>, project: Option<&Path>, cwd: &Path) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    if let Some(project) = project {
        let pf = ProjectFile::from_file_or_dir(project)?;
        let dotbrains = DotBrains::load(pf.directory())?;
        return dotbrains
            .default_brain()
            .map(|b| b.name.clone())
            .ok_or(Error::NoProjectBrain);
    }

    DotBrains::load(cwd)?
        .default_brain()
        .map(|b| b.name.clone())
        .ok_or(Error::MissingBrainName)
}
