//! `diagnose`: run the diaglet chain against a brain version

use bonsai_diagnose::diaglets::LastNRecords;
use bonsai_diagnose::{
    Chain, ChainEvent, ContainerInstanceClient, Context, DiagnoseConfig, Diaglet, Error,
    LogAnalyticsClient, ResultSink, container_group_name, default_log_root, unique_run_name,
};
use colored::Colorize;

use crate::cli::{DiagnoseArgs, Target};
use crate::context::Session;
use crate::error::{CliError, Result};

/// Run the diagnose command
///
/// Looks up the brain version to find its simulator container groups,
/// then runs the standard chain and prints each finding as it arrives.
pub fn run_diagnose(session: &Session, args: &DiagnoseArgs) -> Result<()> {
    let brain = session.brain(&Target {
        brain: args.brain.clone(),
        project: args.project.clone(),
    })?;
    let config = diagnose_config(session, args, &brain)?;

    let mut logs = LogAnalyticsClient::new(&config.log_workspace_id, &args.token, session.timeout)?;
    if let Some(url) = &args.log_analytics_url {
        logs = logs.with_base_url(url)?;
    }
    let mut containers =
        ContainerInstanceClient::new(&config.subscription_id, &args.token, session.timeout)?;
    if let Some(url) = &args.resource_manager_url {
        containers = containers.with_base_url(url)?;
    }
    let sink = ResultSink::create(&config)?;

    let ctx = Context {
        config: &config,
        logs: &logs,
        containers: &containers,
        sink: &sink,
    };

    println!(
        "Diagnosing {} version {}, concept {}...",
        brain.cyan(),
        config.brain_version,
        config.concept_name.cyan()
    );
    Chain::standard().run(&ctx, print_event)?;

    if args.all_records {
        let finding = LastNRecords.diagnose(&ctx)?;
        print_finding(LastNRecords.friendly_name(), &finding.message);
    }

    println!();
    println!("Results saved to {}", sink.dir().display());
    Ok(())
}

fn diagnose_config(session: &Session, args: &DiagnoseArgs, brain: &str) -> Result<DiagnoseConfig> {
    let profile = session.config.profile();
    let subscription_id = profile
        .subscription_id
        .ok_or(Error::MissingSetting("subscription_id"))?;
    let resource_group = profile
        .resource_group
        .ok_or(Error::MissingSetting("resource_group"))?;
    let log_workspace_id = profile
        .log_workspace_id
        .ok_or(Error::MissingSetting("log_workspace_id"))?;

    let api = session.api()?;
    let version = api.brain_version(brain, &args.version)?;
    let brain_version = match version.version {
        Some(number) => number,
        None => args.version.parse().map_err(|_| {
            CliError::user(format!(
                "Unable to determine the version number of {brain} version {}",
                args.version
            ))
        })?,
    };

    let log_root = match &args.log_dir {
        Some(dir) => dir.clone(),
        None => default_log_root()?,
    };

    Ok(DiagnoseConfig {
        brain_name: brain.to_string(),
        brain_version,
        concept_name: args.concept.clone(),
        workspace_id: api.username().to_string(),
        subscription_id,
        resource_group,
        log_workspace_id,
        log_root,
        unique_name: unique_run_name(&chrono::Local::now()),
        container_group: container_group_name(&version, &args.concept),
    })
}

fn print_event(event: &ChainEvent) {
    match event {
        ChainEvent::Finding {
            friendly_name,
            finding,
            ..
        } => print_finding(friendly_name, &finding.message),
        ChainEvent::SegmentStopped => {
            println!("{}", "Cannot continue diagnostics in this segment.".yellow())
        }
        ChainEvent::ChainStopped => println!("{}", "Diagnosis stopped early.".yellow()),
    }
}

fn print_finding(friendly_name: &str, message: &str) {
    println!();
    println!("{}", friendly_name.bold());
    println!("{message}");
}
