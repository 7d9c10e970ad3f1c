//! Bonsai CLI
//!
//! Command-line client for the Bonsai BRAIN service: manage profiles and
//! project files, create and train brains, and diagnose training problems.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod output;

use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ProjectAction, SimsAction, TrainAction};
use context::Session;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} BRAIN command line interface", "bonsai".green().bold());
        println!();
        println!("Run {} for available commands.", "bonsai --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "bonsai", &mut std::io::stdout());
        return Ok(());
    }

    let mut session = Session::load(cli.profile.as_deref(), Duration::from_secs(cli.timeout))?;
    execute_command(&mut session, command)
}

/// DEBUG with `--verbose`, otherwise `RUST_LOG` or warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Configure {
            username,
            access_key,
            show,
        } => commands::run_configure(session, username, access_key, show),
        Commands::Switch { profile, url, show } => {
            commands::run_switch(session, profile.as_deref(), url.as_deref(), show)
        }
        Commands::List { json } => commands::run_list(session, json),
        Commands::Create {
            brain_name,
            project,
            json,
        } => commands::run_create(session, brain_name.as_deref(), project.as_deref(), json),
        Commands::Delete { brain_name } => commands::run_delete(session, &brain_name),
        Commands::Push { target, json } => commands::run_push(session, &target, json),
        Commands::Train { action } => match action {
            TrainAction::Start {
                target,
                remote,
                json,
            } => commands::run_train_start(session, &target, remote, json),
            TrainAction::Stop { target, json } => commands::run_train_stop(session, &target, json),
            TrainAction::Status { target, json } => {
                commands::run_train_status(session, &target, json)
            }
            TrainAction::Resume {
                target,
                version,
                remote,
                json,
            } => commands::run_train_resume(session, &target, &version, remote, json),
        },
        Commands::Sims { action } => match action {
            SimsAction::List { target, json } => commands::run_sims_list(session, &target, json),
        },
        Commands::Log {
            target,
            version,
            sim,
        } => commands::run_log(session, &target, &version, &sim),
        Commands::Project { action } => match action {
            ProjectAction::Init { project } => {
                commands::run_project_init(session, project.as_deref())
            }
            ProjectAction::Add { patterns, project } => {
                commands::run_project_add(session, &patterns, project.as_deref())
            }
            ProjectAction::Remove { patterns, project } => {
                commands::run_project_remove(session, &patterns, project.as_deref())
            }
            ProjectAction::Files { project, json } => {
                commands::run_project_files(session, project.as_deref(), json)
            }
            ProjectAction::Validate { project } => {
                commands::run_project_validate(session, project.as_deref())
            }
        },
        Commands::Diagnose(args) => commands::run_diagnose(session, &args),
        // handled before the session is loaded
        Commands::Completions { .. } => Ok(()),
    }
}
