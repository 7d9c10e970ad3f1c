//! Well-known file and directory names inside a Bonsai project.

use std::path::Path;

/// Standard project filesystem markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The project manifest (`bonsai_brain.bproj`)
    Manifest,
    /// The per-directory brain reference file (`.brains`)
    DotBrains,
    /// The `.git` directory, never uploaded
    GitDir,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "bonsai_brain.bproj",
            Self::DotBrains => ".brains",
            Self::GitDir => ".git",
        }
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
