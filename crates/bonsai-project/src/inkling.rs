//! Selection of the project's single inkling file

use crate::{Error, ProjectFile, Result};

/// Extension of inkling source files.
pub const INKLING_EXTENSION: &str = ".ink";

impl ProjectFile {
    /// The one resolved file with the inkling extension.
    ///
    /// Zero or several candidates is an error; the manifest never picks one
    /// on the user's behalf.
    pub fn inkling_file(&self) -> Result<String> {
        let candidates: Vec<String> = self
            .list_paths()?
            .into_iter()
            .filter(|path| path.ends_with(INKLING_EXTENSION))
            .collect();

        match candidates.as_slice() {
            [] => Err(Error::NoInklingFile),
            [only] => Ok(only.clone()),
            [first, second, ..] => Err(Error::MultipleInklingFiles {
                first: first.clone(),
                second: second.clone(),
                count: candidates.len(),
            }),
        }
    }
}
