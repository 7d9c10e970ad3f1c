//! Bearer-token JSON requests shared by the telemetry clients

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct AzureHttp {
    http: Client,
    token: String,
    service: &'static str,
}

/// Outcome of a request whose failure body the caller wants to inspect.
pub(crate) enum Reply {
    Ok(Value),
    Failed { status: u16, body: String },
}

impl AzureHttp {
    pub(crate) fn new(service: &'static str, token: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(bonsai_api::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            token: token.to_string(),
            service,
        })
    }

    pub(crate) fn get(&self, url: &str) -> Result<Value> {
        self.expect_ok(self.send(self.http.get(url), url)?)
    }

    pub(crate) fn post(&self, url: &str, body: &Value) -> Result<Reply> {
        self.send(self.http.post(url).json(body), url)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Reply> {
        tracing::debug!(service = self.service, url, "sending request");
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();
        let body = response.text()?;
        tracing::debug!(service = self.service, status = status.as_u16(), body = %body, "response");

        if !status.is_success() {
            return Ok(Reply::Failed {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Reply::Ok(Value::Null));
        }
        serde_json::from_str(&body)
            .map(Reply::Ok)
            .map_err(|e| self.invalid(e.to_string()))
    }

    pub(crate) fn expect_ok(&self, reply: Reply) -> Result<Value> {
        match reply {
            Reply::Ok(value) => Ok(value),
            Reply::Failed { status, body } => Err(self.failed(status, &body)),
        }
    }

    /// Error for a failed request, preferring the service's own message.
    pub(crate) fn failed(&self, status: u16, body: &str) -> Error {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        Error::Service {
            service: self.service,
            status,
            message,
        }
    }

    pub(crate) fn invalid(&self, message: impl Into<String>) -> Error {
        Error::InvalidResponse {
            service: self.service,
            message: message.into(),
        }
    }
}
