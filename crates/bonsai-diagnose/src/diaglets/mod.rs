//! Individual diagnostic checks
//!
//! A diaglet asks one question of the telemetry, saves what it saw, and
//! reports a one-paragraph [`Finding`]. A finding may ask the chain to stop
//! when later checks cannot say anything useful.

mod container;
mod simulator;
mod training;

use std::path::PathBuf;
use std::time::Duration;

pub use container::ContainerRestarts;
pub use simulator::{Errors, LastNRecords, SdkVersion, SimTimeout, SysLogsEnabled};
pub use training::{EpisodeLogsEnabled, IterationHalted};

use crate::config::DiagnoseConfig;
use crate::containers::ContainerGroups;
use crate::logs::{LogQuery, LogTable};
use crate::sink::ResultSink;
use crate::Result;

/// How far back every query looks.
pub const QUERY_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// What a diaglet concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    /// Later diaglets in the same chain stage should not run
    pub break_chain: bool,
}

impl Finding {
    pub fn report(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            break_chain: false,
        }
    }

    pub fn stop(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            break_chain: true,
        }
    }
}

/// Everything a diaglet may use.
pub struct Context<'a> {
    pub config: &'a DiagnoseConfig,
    pub logs: &'a dyn LogQuery,
    pub containers: &'a dyn ContainerGroups,
    pub sink: &'a ResultSink,
}

impl Context<'_> {
    /// Run `kql` over [`QUERY_WINDOW`] and save the rows under `diaglet`'s
    /// name.
    pub fn run_query(&self, diaglet: &str, kql: &str) -> Result<(LogTable, PathBuf)> {
        tracing::debug!(diaglet, kql, "running query");
        let outcome = self.logs.query(kql, QUERY_WINDOW)?;
        let path = self.sink.save(diaglet, &outcome.table)?;
        Ok((outcome.table, path))
    }
}

/// One diagnostic check.
pub trait Diaglet {
    /// Stable identifier, used to name result files.
    fn name(&self) -> &'static str;

    /// Heading shown next to the finding.
    fn friendly_name(&self) -> &'static str;

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding>;
}

/// Quote `value` as a KQL string literal.
pub(crate) fn kql_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kql_strings_are_escaped() {
        assert_eq!(kql_string("bv_1"), "\"bv_1\"");
        assert_eq!(kql_string(r#"a"b"#), r#""a\"b""#);
    }
}
