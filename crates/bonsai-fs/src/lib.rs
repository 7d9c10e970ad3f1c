//! Filesystem layer for the Bonsai CLI
//!
//! Provides normalized, project-relative path handling and safe I/O
//! operations shared by the project and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format, to_json_pretty};
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, same_file};
