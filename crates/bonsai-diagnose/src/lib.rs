//! Training health diagnostics for Bonsai brains
//!
//! A [`Chain`] of [`Diaglet`]s inspects the telemetry of one brain version:
//! restart counts of its managed simulator containers ([`ContainerGroups`])
//! and its Log Analytics tables ([`LogQuery`]). Each diaglet saves the rows it
//! looked at through a [`ResultSink`] and reports a [`Finding`].

pub mod chain;
pub mod config;
pub mod containers;
pub mod diaglets;
pub mod error;
pub mod logs;
pub mod sink;

mod azure;

pub use chain::{Chain, ChainEvent, Stage};
pub use config::{DiagnoseConfig, container_group_name, default_log_root, unique_run_name};
pub use containers::{ContainerGroups, ContainerInstanceClient, GroupRestarts};
pub use diaglets::{Context, Diaglet, Finding};
pub use error::{Error, Result};
pub use logs::{LogAnalyticsClient, LogQuery, LogTable, QueryOutcome};
pub use sink::ResultSink;

use url::Url;

/// `base` with `segments` appended as percent-encoded path segments.
pub(crate) fn url_with_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
