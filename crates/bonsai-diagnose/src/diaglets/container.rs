use serde_json::json;

use super::{Context, Diaglet, Finding};
use crate::Result;
use crate::logs::LogTable;

/// Counts restarts of the managed simulator containers, a common symptom
/// of a simulator that crashes.
#[derive(Debug, Default)]
pub struct ContainerRestarts;

impl Diaglet for ContainerRestarts {
    fn name(&self) -> &'static str {
        "ContainerRestartsDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Managed Simulator Restarts"
    }

    fn diagnose(&self, ctx: &Context<'_>) -> Result<Finding> {
        let resource_group = &ctx.config.resource_group;
        let filter = &ctx.config.container_group;

        let mut table = LogTable::new(["ContainerGroup", "Restarts"]);
        let mut total_restarts = 0;
        let mut total_instances = 0;

        for group in ctx.containers.list_groups(resource_group)? {
            // only this brain version's groups
            if !group.contains(filter.as_str()) {
                continue;
            }
            let detail = ctx.containers.group_restarts(resource_group, &group)?;
            tracing::debug!(group, restarts = detail.restarts, "container group");

            total_instances += detail.instances;
            if detail.restarts > 0 {
                total_restarts += detail.restarts;
                table.push_row(vec![json!(group), json!(detail.restarts)]);
            }
        }

        ctx.sink.save(self.name(), &table)?;

        let message = if total_restarts > 0 && total_instances > 0 {
            [
                format!("There are {total_restarts} restarts across {total_instances} simulator instances."),
                "This is commonly due to errors during simulator execution.".to_string(),
                "See https://docs.microsoft.com/bonsai/ui/sim-restart to learn about common causes and remedies for restarts.".to_string(),
            ]
            .join("\n")
        } else if total_instances > 0 {
            format!("There are 0 restarts across {total_instances} simulator instances.")
        } else {
            "There are no simulator restarts.".to_string()
        };
        Ok(Finding::report(message))
    }
}
