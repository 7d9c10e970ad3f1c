//! Blocking client for the BRAIN REST API

use std::time::Duration;

use bonsai_project::ProjectFile;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::config::Credentials;
use crate::endpoint::Endpoint;
use crate::payload::{MultipartBody, ProjectPayload};
use crate::response::{BrainList, BrainVersion, Document, Validation, decode};
use crate::{Error, Result};

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!(
        "bonsai-cli/{} (rust; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

enum Body {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// Client bound to one user and one service url.
///
/// Every call is a single blocking request; failures are returned, never
/// retried. Redirects are not followed.
#[derive(Debug, Clone)]
pub struct BonsaiApi {
    http: Client,
    base_url: Url,
    api_url: String,
    username: String,
    access_key: String,
}

impl BonsaiApi {
    /// Create a client with the default timeout.
    pub fn new(access_key: &str, username: &str, api_url: &str) -> Result<Self> {
        Self::with_timeout(access_key, username, api_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        access_key: &str,
        username: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(api_url).map_err(|source| Error::InvalidUrl {
            url: api_url.to_string(),
            source,
        })?;

        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        tracing::debug!(user = username, url = api_url, ?timeout, "bootstrapping BRAIN api client");
        Ok(Self {
            http,
            base_url,
            api_url: api_url.to_string(),
            username: username.to_string(),
            access_key: access_key.to_string(),
        })
    }

    pub fn from_credentials(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        Self::with_timeout(
            &credentials.access_key,
            &credentials.username,
            &credentials.url,
            timeout,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check the access key, returning the username it belongs to.
    pub fn validate(&self) -> Result<Validation> {
        tracing::debug!("validating access key");
        self.call(Method::Post, Endpoint::Validate, Body::Empty)
    }

    pub fn list_brains(&self) -> Result<BrainList> {
        tracing::debug!(user = %self.username, "listing brains");
        self.call(
            Method::Get,
            Endpoint::ListBrains {
                user: &self.username,
            },
            Body::Empty,
        )
    }

    /// Create an empty brain.
    pub fn create_brain(&self, brain: &str) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "creating brain");
        self.call(
            Method::Post,
            Endpoint::CreateBrain {
                user: &self.username,
            },
            Body::Json(json!({ "name": brain })),
        )
    }

    /// Create a brain and upload the files of `project` to it.
    pub fn create_brain_from_project(&self, brain: &str, project: &ProjectFile) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "creating brain from project");
        let payload = ProjectPayload::for_create(brain, project)?;
        self.call(
            Method::Post,
            Endpoint::CreateBrain {
                user: &self.username,
            },
            Body::Multipart(payload.encode()?),
        )
    }

    pub fn delete_brain(&self, brain: &str) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "deleting brain");
        self.call(Method::Delete, self.brain(brain), Body::Empty)
    }

    /// Replace the project files of an existing brain.
    pub fn edit_brain(&self, brain: &str, project: &ProjectFile) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "editing brain");
        let payload = ProjectPayload::for_edit(project)?;
        self.call(
            Method::Put,
            self.brain(brain),
            Body::Multipart(payload.encode()?),
        )
    }

    /// Whether `brain` exists. A 404 is `false`; other failures are errors.
    pub fn brain_exists(&self, brain: &str) -> Result<bool> {
        let response = self.dispatch(Method::Get, self.brain(brain), Body::Empty)?;
        tracing::debug!(brain, status = response.status().as_u16(), "brain lookup");
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        self.read_body(response)?;
        Ok(true)
    }

    /// Details of one version of a brain, `latest` included.
    pub fn brain_version(&self, brain: &str, version: &str) -> Result<BrainVersion> {
        tracing::debug!(brain, version, "getting brain version");
        self.call(
            Method::Get,
            Endpoint::BrainVersion {
                user: &self.username,
                brain,
                version,
            },
            Body::Empty,
        )
    }

    pub fn list_simulators(&self, brain: &str) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "listing simulators");
        self.call(
            Method::Get,
            Endpoint::Simulators {
                user: &self.username,
                brain,
            },
            Body::Empty,
        )
    }

    /// Log lines of simulator `sim` for a brain version.
    pub fn simulator_logs(&self, brain: &str, version: &str, sim: &str) -> Result<Vec<String>> {
        tracing::debug!(brain, version, sim, "getting simulator logs");
        self.call(
            Method::Get,
            Endpoint::SimulatorLogs {
                user: &self.username,
                brain,
                version,
                sim,
            },
            Body::Empty,
        )
    }

    pub fn brain_status(&self, brain: &str) -> Result<Document> {
        tracing::debug!(brain, user = %self.username, "getting brain status");
        self.call(
            Method::Get,
            Endpoint::Status {
                user: &self.username,
                brain,
            },
            Body::Empty,
        )
    }

    /// Start training. With `manage_simulator` the service runs the
    /// simulator itself.
    pub fn start_training(&self, brain: &str, manage_simulator: bool) -> Result<Document> {
        tracing::debug!(brain, manage_simulator, "starting training");
        self.call(
            Method::Put,
            Endpoint::Train {
                user: &self.username,
                brain,
            },
            Body::Json(training_body(manage_simulator)),
        )
    }

    pub fn stop_training(&self, brain: &str) -> Result<Document> {
        tracing::debug!(brain, "stopping training");
        self.call(
            Method::Put,
            Endpoint::Stop {
                user: &self.username,
                brain,
            },
            Body::Empty,
        )
    }

    /// Resume training of `version`.
    pub fn resume_training(
        &self,
        brain: &str,
        version: &str,
        manage_simulator: bool,
    ) -> Result<Document> {
        tracing::debug!(brain, version, manage_simulator, "resuming training");
        self.call(
            Method::Put,
            Endpoint::Resume {
                user: &self.username,
                brain,
                version,
            },
            Body::Json(training_body(manage_simulator)),
        )
    }

    fn brain<'a>(&'a self, brain: &'a str) -> Endpoint<'a> {
        Endpoint::Brain {
            user: &self.username,
            brain,
        }
    }

    fn call<T>(&self, method: Method, endpoint: Endpoint<'_>, body: Body) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.dispatch(method, endpoint, body)?;
        let url = response.url().to_string();
        let text = self.read_body(response)?;
        decode(&url, &text)
    }

    fn dispatch(&self, method: Method, endpoint: Endpoint<'_>, body: Body) -> Result<Response> {
        let url = endpoint.url(&self.base_url)?;
        tracing::debug!(?method, url = %url, "sending request");

        let request = match method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Put => self.http.put(url.clone()),
            Method::Delete => self.http.delete(url.clone()),
        };

        let request = if uses_basic_auth(method, &body) {
            request.basic_auth(&self.username, Some(&self.access_key))
        } else {
            request.header(AUTHORIZATION, &self.access_key)
        };

        self.send(with_body(request, body), &url)
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        request.send().map_err(|e| transport_error(url.as_str(), e))
    }

    /// Read the body of `response`, turning error statuses into
    /// [`Error::BrainServer`].
    fn read_body(&self, response: Response) -> Result<String> {
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().map_err(|e| transport_error(&url, e))?;
        tracing::debug!(url = %url, status = status.as_u16(), body = %text, "response");

        match self.failure_line(status, &url) {
            Some(line) => Err(Error::BrainServer {
                status: Some(status.as_u16()),
                message: format!("{line}\n{}", failure_detail(&text)),
            }),
            None => Ok(text),
        }
    }

    fn failure_line(&self, status: StatusCode, url: &str) -> Option<String> {
        if status == StatusCode::MOVED_PERMANENTLY {
            return Some(format!(
                "301 Moved Permanently: Likely misconfigured url: {}",
                self.api_url
            ));
        }
        let kind = if status.is_client_error() {
            "Client Error"
        } else if status.is_server_error() {
            "Server Error"
        } else {
            return None;
        };
        Some(format!(
            "{} {kind}: {} for url: {url}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
    }
}

fn with_body(request: RequestBuilder, body: Body) -> RequestBuilder {
    match body {
        Body::Empty => request,
        Body::Json(value) => request.json(&value),
        Body::Multipart(multipart) => request
            .header(CONTENT_TYPE, multipart.content_type)
            .body(multipart.body),
    }
}

/// Plain JSON posts (validate, name-only create) authenticate with the
/// username and key; everything else sends the key alone.
fn uses_basic_auth(method: Method, body: &Body) -> bool {
    method == Method::Post && !matches!(body, Body::Multipart(_))
}

/// Network failures share the shape of service errors, without a status.
fn transport_error(url: &str, error: reqwest::Error) -> Error {
    tracing::debug!(url, error = %error, "request failed");
    let message = if error.is_connect() {
        format!("Unable to connect to domain: {url}")
    } else {
        format!("Request to {url} failed: {}", root_cause(&error))
    };
    Error::BrainServer {
        status: None,
        message,
    }
}

fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}

fn training_body(manage_simulator: bool) -> Value {
    if manage_simulator {
        json!({ "manage_simulator": true })
    } else {
        json!({})
    }
}

/// Second line of a failure message, using the service's `error` field
/// when the body carries one.
fn failure_detail(body: &str) -> String {
    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").cloned());
    match error {
        Some(Value::String(message)) => format!("Request failed with error message:\n{message}"),
        Some(other) => format!("Request failed with error message:\n{other}"),
        None => "Request failed.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_detail_uses_error_field() {
        assert_eq!(
            failure_detail(r#"{"error": "brain is busy"}"#),
            "Request failed with error message:\nbrain is busy"
        );
        assert_eq!(failure_detail("<html>"), "Request failed.");
        assert_eq!(failure_detail(r#"{"message": "x"}"#), "Request failed.");
    }

    #[test]
    fn user_agent_names_the_cli() {
        assert!(user_agent().starts_with("bonsai-cli/"));
        assert!(user_agent().contains("(rust; "));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = BonsaiApi::new("key", "bill", "not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn basic_auth_only_for_plain_posts() {
        assert!(uses_basic_auth(Method::Post, &Body::Empty));
        assert!(uses_basic_auth(Method::Post, &Body::Json(json!({"name": "x"}))));
        assert!(!uses_basic_auth(Method::Put, &Body::Json(json!({}))));
        assert!(!uses_basic_auth(Method::Get, &Body::Empty));
    }

    #[test]
    fn training_body_shape() {
        assert_eq!(training_body(false), json!({}));
        assert_eq!(training_body(true), json!({"manage_simulator": true}));
    }
}
