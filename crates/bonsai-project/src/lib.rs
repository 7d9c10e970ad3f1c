//! Project manifest handling for the Bonsai CLI
//!
//! A Bonsai project is a directory holding a `bonsai_brain.bproj` manifest.
//! The manifest declares glob patterns for the files that make up a
//! trainable model plus an opaque `training` block. This crate loads and
//! saves the manifest, expands its patterns into concrete project-relative
//! files, validates them before upload, and picks the single inkling file.
//!
//! It also manages the `.brains` file that remembers which remote brain a
//! project directory is bound to.

pub mod dotbrains;
pub mod error;
pub mod inkling;
pub mod manifest;
pub mod resolver;
pub mod validate;

pub use dotbrains::{BrainRef, DotBrains, resolve_brain_name};
pub use error::{Error, Result};
pub use inkling::INKLING_EXTENSION;
pub use manifest::{DEFAULT_MANIFEST, ProjectFile};
pub use validate::MAX_FILE_SIZE;
