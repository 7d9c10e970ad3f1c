//! Error types for bonsai-diagnose

/// Result type for bonsai-diagnose operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while diagnosing a brain
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A telemetry service rejected a request
    #[error("{service} request failed ({status}): {message}")]
    Service {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// A telemetry response did not have the expected shape
    #[error("Unexpected response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    /// Settings needed to reach the telemetry services are missing
    #[error("Missing diagnostics setting: {0}")]
    MissingSetting(&'static str),

    /// No home directory to place diagnostic output in
    #[error("Unable to determine the home directory")]
    NoHomeDirectory,

    /// Service url could not be built
    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bonsai-fs
    #[error(transparent)]
    Fs(#[from] bonsai_fs::Error),

    /// BRAIN api error
    #[error(transparent)]
    Api(#[from] bonsai_api::Error),

    /// HTTP transport error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
