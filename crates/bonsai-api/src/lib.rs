//! Client SDK for the Bonsai BRAIN service
//!
//! [`BonsaiApi`] issues one blocking HTTP request per operation against the
//! versioned REST API. Project uploads are sent as `multipart/mixed` bodies
//! built from a [`bonsai_project::ProjectFile`]. Credentials come from the
//! profile [`Config`].

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod payload;
pub mod response;

pub use client::{BonsaiApi, DEFAULT_TIMEOUT, user_agent};
pub use config::{Config, Credentials, DEFAULT_API_URL, EnvOverrides, Profile};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use payload::{MultipartBody, ProjectPayload};
pub use response::{BrainList, BrainSummary, BrainVersion, ConceptRef, Document, Validation};
