//! Log Analytics queries
//!
//! Diaglets ask KQL questions through [`LogQuery`]. [`LogAnalyticsClient`]
//! answers them over the Log Analytics REST API with a caller-supplied
//! bearer token.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::azure::{AzureHttp, Reply};
use crate::{Result, url_with_segments};

/// Public Log Analytics endpoint.
pub const LOG_ANALYTICS_URL: &str = "https://api.loganalytics.io";

/// Returned by the service when a table was never created, i.e. the user
/// never enabled that kind of logging.
const TABLE_MISSING: &str = "Failed to resolve table";

/// Rows returned by a query, duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl LogTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` in the column called `column`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// Drop repeated rows, keeping the first occurrence.
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.rows
            .retain(|row| seen.insert(serde_json::to_string(row).unwrap_or_default()));
    }
}

/// Result of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub table: LogTable,
    /// Set when the service returned only part of the data
    pub partial_error: Option<String>,
}

/// Something that can run KQL against a log workspace.
pub trait LogQuery {
    /// Run `kql` over the last `timespan`.
    fn query(&self, kql: &str, timespan: Duration) -> Result<QueryOutcome>;
}

/// [`LogQuery`] over the Log Analytics REST API.
#[derive(Debug, Clone)]
pub struct LogAnalyticsClient {
    http: AzureHttp,
    base_url: Url,
    workspace_id: String,
}

impl LogAnalyticsClient {
    pub fn new(workspace_id: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: AzureHttp::new("Log Analytics", token, timeout)?,
            base_url: Url::parse(LOG_ANALYTICS_URL)?,
            workspace_id: workspace_id.to_string(),
        })
    }

    /// Point the client at another endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }
}

impl LogQuery for LogAnalyticsClient {
    fn query(&self, kql: &str, timespan: Duration) -> Result<QueryOutcome> {
        let url = url_with_segments(
            &self.base_url,
            &["v1", "workspaces", &self.workspace_id, "query"],
        )?;
        let body = json!({
            "query": kql,
            "timespan": iso8601(timespan),
        });

        let value = match self.http.post(url.as_str(), &body)? {
            Reply::Failed { body, .. } if body.contains(TABLE_MISSING) => {
                tracing::debug!("log table does not exist, treating as empty");
                return Ok(QueryOutcome::default());
            }
            reply => self.http.expect_ok(reply)?,
        };

        let outcome = parse_outcome(&value);
        if let Some(error) = &outcome.partial_error {
            tracing::warn!(%error, "query returned partial results");
        }
        tracing::debug!(rows = outcome.table.len(), "query complete");
        Ok(outcome)
    }
}

/// `PT<seconds>S`
fn iso8601(duration: Duration) -> String {
    format!("PT{}S", duration.as_secs())
}

/// Read the first table of a query response.
///
/// ```json
/// {"tables": [{"name": "PrimaryResult",
///              "columns": [{"name": "Message", "type": "string"}],
///              "rows": [["..."]]}],
///  "error": {"message": "partial"}}
/// ```
fn parse_outcome(value: &Value) -> QueryOutcome {
    let partial_error = value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(first) = value.pointer("/tables/0") else {
        return QueryOutcome {
            table: LogTable::default(),
            partial_error,
        };
    };

    let columns = first["columns"]
        .as_array()
        .map(|cols| {
            cols.iter()
                .map(|c| c["name"].as_str().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut table = LogTable::new(columns);
    for row in first["rows"].as_array().into_iter().flatten() {
        if let Some(cells) = row.as_array() {
            table.push_row(cells.clone());
        }
    }
    table.dedup();

    QueryOutcome {
        table,
        partial_error,
    }
}
