//! Error types for bonsai-api

/// Result type for bonsai-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the BRAIN service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service rejected a request, or could not be reached.
    ///
    /// `status` is `None` when no response was received.
    #[error("{message}")]
    BrainServer { status: Option<u16>, message: String },

    /// A non-empty response body was not valid JSON for the expected shape
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Required profile settings are missing
    #[error("{0}")]
    MissingConfiguration(String),

    /// Named profile does not exist in the configuration file
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// The configured API url could not be parsed
    #[error("Invalid API url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No home directory to place the configuration file in
    #[error("Unable to determine the home directory")]
    NoHomeDirectory,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bonsai-fs
    #[error(transparent)]
    Fs(#[from] bonsai_fs::Error),

    /// Project error from bonsai-project
    #[error(transparent)]
    Project(#[from] bonsai_project::Error),

    /// HTTP transport error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BrainServer { status, .. } => *status,
            _ => None,
        }
    }
}
