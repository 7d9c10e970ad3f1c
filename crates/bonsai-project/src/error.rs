//! Error types for bonsai-project

use std::path::PathBuf;

/// Result type for bonsai-project operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while working with a project
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared pattern matched nothing on disk
    #[error("Unable to find {pattern}, as specified in {}", .manifest.display())]
    FileNotFound { pattern: String, manifest: PathBuf },

    /// A referenced file exceeds the upload size ceiling
    #[error(
        "The file {} exceeds our size limit. The system does not accept files with a size \
         greater than 640KB. Please remove the file from the project file and try again.",
        .file.display()
    )]
    FileTooLarge { file: PathBuf },

    #[error("No inkling file found")]
    NoInklingFile,

    #[error(
        "Multiple inkling files found. Set one in \"files\" in the project file to indicate \
         which should be loaded. {first},{second}, ... {count} total"
    )]
    MultipleInklingFiles {
        first: String,
        second: String,
        count: usize,
    },

    /// The manifest parsed but has the wrong shape
    #[error("Invalid project file {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Missing brain name. Specify a name with `--brain NAME`.")]
    MissingBrainName,

    #[error("No Brains found with the given project")]
    NoProjectBrain,

    #[error("Brain {name} is not listed in {}", .path.display())]
    BrainNotFound { name: String, path: PathBuf },

    /// Filesystem error from bonsai-fs
    #[error(transparent)]
    Fs(#[from] bonsai_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
