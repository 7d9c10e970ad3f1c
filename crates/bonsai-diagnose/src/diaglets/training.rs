//! Checks against the training logs (`EpisodeLog_CL`, `IterationLog_CL`)

use super::{Context, Diaglet, Finding, kql_string};
use crate::Result;

/// Filter lines for this brain version. Brain names are stored lower-case.
fn brain_filter(ctx: &Context<'_>) -> [String; 2] {
    [
        format!(
            "| where BrainName_s=={}",
            kql_string(&ctx.config.brain_name.to_lowercase())
        ),
        format!("| where BrainVersion_d=={}", ctx.config.brain_version),
    ]
}

/// Whether episode logging is enabled for the brain version.
#[derive(Debug, Default)]
pub struct EpisodeLogsEnabled;

impl Diaglet for EpisodeLogsEnabled {
    fn name(&self) -> &'static str {
        "EpisodeLogsEnabledDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Episode Logging Check"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let [name, version] = brain_filter(ctx);
        let kql = ["EpisodeLog_CL", name.as_str(), version.as_str(), "| limit 1"].join("\n");
        let (table, _) = ctx.run_query(self.name(), &kql)?;

        if table.is_empty() {
            Ok(Finding::stop(
                "There are no episode logs. See https://docs.microsoft.com/en-us/bonsai/guides/sim-logging for how to enable episode logs.",
            ))
        } else {
            Ok(Finding::report("Episode logging is enabled. Continuing."))
        }
    }
}

/// Counts iterations the simulator reported as halted.
#[derive(Debug, Default)]
pub struct IterationHalted;

impl Diaglet for IterationHalted {
    fn name(&self) -> &'static str {
        "IterationHaltedDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Iteration Halted Check"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let [name, version] = brain_filter(ctx);
        let kql = [
            "IterationLog_CL",
            name.as_str(),
            version.as_str(),
            "| where Halted_b==true",
            "| limit 1000",
        ]
        .join("\n");
        let (table, _) = ctx.run_query(self.name(), &kql)?;

        if table.is_empty() {
            return Ok(Finding::report("There are no halted iterations."));
        }
        Ok(Finding::report(
            [
                format!("There are {} halted iterations.", table.len()),
                "Halted iterations may impact brain training if not used with an avoid goal in inkling.".to_string(),
                "See https://docs.microsoft.com/bonsai/ui/sim-halted to learn about common causes and remedies for halted conditions.".to_string(),
            ]
            .join("\n"),
        ))
    }
}
