//! Error types for bonsai-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bonsai-project
    #[error(transparent)]
    Project(#[from] bonsai_project::Error),

    /// Error from the BRAIN api client
    #[error(transparent)]
    Api(#[from] bonsai_api::Error),

    /// Error from bonsai-diagnose
    #[error(transparent)]
    Diagnose(#[from] bonsai_diagnose::Error),

    /// Error from bonsai-fs
    #[error(transparent)]
    Fs(#[from] bonsai_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Put `heading` on its own line above the message.
    pub fn context(self, heading: &str) -> Self {
        Self::user(format!("{heading}\n{self}"))
    }
}
