//! Response bodies returned by the BRAIN service

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Generic JSON object response.
pub type Document = Map<String, Value>;

/// Decode a response body.
///
/// The service is expected to answer every request with JSON. A missing or
/// blank body is treated as the empty value of `T` rather than an error;
/// anything else must parse.
pub fn decode<T>(url: &str, body: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Body of `POST /v1/validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    #[serde(default)]
    pub username: String,
}

/// A brain as listed by `GET /v1/{user}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainList {
    #[serde(default)]
    pub brains: Vec<BrainSummary>,
}

impl BrainList {
    pub fn contains(&self, name: &str) -> bool {
        self.brains.iter().any(|b| b.name == name)
    }
}

/// A concept of a brain version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

/// Body of `GET /v1/{user}/{brain}/{version}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainVersion {
    #[serde(default)]
    pub id: String,
    /// Resolved version number; useful when `latest` was requested
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub concepts: Vec<ConceptRef>,
}

/// Training state of a brain with a running session.
pub const STATE_IN_PROGRESS: &str = "In Progress";
/// Training state of a brain the service cannot train.
pub const STATE_ERROR: &str = "Error";

/// The `state` field of a status document, if present.
pub fn state(status: &Document) -> Option<&str> {
    status.get("state").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_body_is_default() {
        let doc: Document = decode("u", "  \n").unwrap();
        assert!(doc.is_empty());
        let lines: Vec<String> = decode("u", "").unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn non_json_body_is_rejected() {
        let err = decode::<Document>("http://x/v1/bill", "<html>").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse { ref url, .. } if url == "http://x/v1/bill"));
    }

    #[test]
    fn brain_list_tolerates_missing_fields() {
        let list: BrainList = decode("u", r#"{"brains": [{"name": "a"}, {"state": "Idle"}]}"#).unwrap();
        assert_eq!(list.brains.len(), 2);
        assert!(list.contains("a"));
        assert_eq!(list.brains[1].name, "");
    }

    #[test]
    fn status_state() {
        let doc: Document = decode("u", r#"{"state": "In Progress", "episode": 3}"#).unwrap();
        assert_eq!(state(&doc), Some(STATE_IN_PROGRESS));
    }
}
