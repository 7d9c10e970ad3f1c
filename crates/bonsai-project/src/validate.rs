//! Pre-upload validation of the manifest

use bonsai_fs::{NormalizedPath, io};

use crate::resolver::expand;
use crate::{Error, ProjectFile, Result};

/// Largest file the service accepts, in bytes (640 KiB).
pub const MAX_FILE_SIZE: u64 = 655_360;

impl ProjectFile {
    /// Check the manifest's declared files against the filesystem.
    ///
    /// Every pattern must match at least one path, and no matched file may
    /// exceed [`MAX_FILE_SIZE`]. The first violation is returned
    /// immediately; errors are not aggregated.
    pub fn validate(&self) -> Result<()> {
        let project_dir = self.directory();

        for pattern in self.files() {
            let literal = project_dir.join(pattern);
            let matches = expand(&project_dir, pattern)?;

            if !literal.exists() && matches.is_empty() {
                return Err(Error::FileNotFound {
                    pattern: pattern.clone(),
                    manifest: self.path().to_native(),
                });
            }

            check_sizes(&matches)?;
        }

        tracing::debug!(path = %self.path(), "project file is valid");
        Ok(())
    }
}

fn check_sizes(files: &[NormalizedPath]) -> Result<()> {
    for file in files.iter().filter(|f| f.is_file()) {
        let size = io::file_size(file)?;
        if size > MAX_FILE_SIZE {
            return Err(Error::FileTooLarge {
                file: file.to_native(),
            });
        }
    }
    Ok(())
}
