//! Checks against the managed simulator console logs
//! (`ContainerInstanceLog_CL`)

use serde_json::Value;

use super::{Context, Diaglet, Finding, kql_string};
use crate::Result;

const SIM_LOGGING_DOCS: &str = "https://docs.microsoft.com/en-us/bonsai/guides/sim-logging";

/// Query lines selecting this brain version's container logs.
fn container_logs(ctx: &Context<'_>) -> Vec<String> {
    vec![
        "ContainerInstanceLog_CL".to_string(),
        format!(
            "| where ContainerGroup_s contains {}",
            kql_string(&ctx.config.container_group)
        ),
    ]
}

fn query(ctx: &Context<'_>, extra: &[&str]) -> String {
    let mut lines = container_logs(ctx);
    lines.extend(extra.iter().map(|l| l.to_string()));
    lines.join("\n")
}

/// Whether simulator logging was ever enabled. Without logs none of the
/// other simulator checks can run.
#[derive(Debug, Default)]
pub struct SysLogsEnabled;

impl Diaglet for SysLogsEnabled {
    fn name(&self) -> &'static str {
        "SysLogsEnabledDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Managed Simulator Logging Check"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let kql = query(ctx, &["| order by TimeGenerated desc", "| limit 1"]);
        let (table, _) = ctx.run_query(self.name(), &kql)?;

        if table.is_empty() {
            Ok(Finding::stop(format!(
                "There are no simulator logs. See {SIM_LOGGING_DOCS} for how to enable logs."
            )))
        } else {
            Ok(Finding::report("Simulator logging is enabled. Continuing."))
        }
    }
}

/// Reports the SDK version line the simulator printed on startup.
#[derive(Debug, Default)]
pub struct SdkVersion;

impl Diaglet for SdkVersion {
    fn name(&self) -> &'static str {
        "SDKVersionDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "SDK Version Check"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let kql = query(
            ctx,
            &[
                "| where Message contains \"microsoft-bonsai-api\" and Message contains \"version\"",
                "| project Message",
                "| limit 1",
            ],
        );
        let (table, _) = ctx.run_query(self.name(), &kql)?;

        let message = match (table.len(), table.value(0, "Message")) {
            (1, Some(Value::String(line))) => line.clone(),
            (1, Some(other)) => other.to_string(),
            _ => "Could not determine SDK version.".to_string(),
        };
        Ok(Finding::report(message))
    }
}

/// Counts simulator timeouts.
#[derive(Debug, Default)]
pub struct SimTimeout;

impl Diaglet for SimTimeout {
    fn name(&self) -> &'static str {
        "SimTimeoutDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Managed Simulator Timeouts"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let kql = query(ctx, &["| where Message contains \"Simulator timed out\""]);
        let (table, _) = ctx.run_query(self.name(), &kql)?;

        if table.is_empty() {
            Ok(Finding::report("There are no simulator timeouts."))
        } else {
            Ok(Finding::report(format!(
                "There are {} simulator timeouts. See https://docs.microsoft.com/en-us/bonsai/troubleshoot/managed-sims/timeout to learn about common causes and remedies for timeouts.",
                table.len()
            )))
        }
    }
}

/// Counts log lines mentioning errors or exceptions.
#[derive(Debug, Default)]
pub struct Errors;

impl Diaglet for Errors {
    fn name(&self) -> &'static str {
        "ErrorsDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Error Check"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let kql = query(
            ctx,
            &[
                "| where Message contains \"error\" or Message contains \"exception\"",
                "| project TimeGenerated, Message",
                "| order by TimeGenerated desc",
            ],
        );
        let (table, path) = ctx.run_query(self.name(), &kql)?;

        if table.is_empty() {
            Ok(Finding::report("No errors or exceptions found in the logs."))
        } else {
            Ok(Finding::report(format!(
                "There are {} errors or exceptions in the logs. See the log file in \"{}\" for details.",
                table.len(),
                path.display()
            )))
        }
    }
}

/// Saves the most recent simulator log lines, whatever they say.
#[derive(Debug, Default)]
pub struct LastNRecords;

/// Number of records [`LastNRecords`] keeps.
pub const LAST_N: usize = 1000;

impl Diaglet for LastNRecords {
    fn name(&self) -> &'static str {
        "LastNRecordsDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Pull last 1000 records"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let limit = format!("| limit {LAST_N}");
        let kql = query(ctx, &["| order by TimeGenerated desc", limit.as_str()]);
        let (table, _) = ctx.run_query(self.name(), &kql)?;
        Ok(Finding::report(format!("Saved the last {} records.", table.len())))
    }
}
