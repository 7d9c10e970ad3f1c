//! Simulator commands: `sims list` and `log`

use colored::Colorize;

use crate::cli::Target;
use crate::context::Session;
use crate::error::Result;
use crate::output;

/// Run the sims list command
pub fn run_sims_list(session: &Session, target: &Target, json: bool) -> Result<()> {
    let brain = session.brain(target)?;
    let simulators = session.api()?.list_simulators(&brain)?;
    if json {
        return output::print_json(&simulators);
    }

    if simulators.is_empty() {
        println!("You have not started training.");
        println!("Please run 'bonsai train start' first.");
        return Ok(());
    }

    println!("Simulators for {}:", brain.cyan());
    let width = simulators.keys().map(String::len).max().unwrap_or(0).max("NAME".len());
    println!("{:<width$}  INSTANCES  STATUS", "NAME");
    for name in simulators.keys() {
        println!("{name:<width$}  {:<9}  connected", 1);
    }
    Ok(())
}

/// Run the log command
pub fn run_log(session: &Session, target: &Target, version: &str, sim: &str) -> Result<()> {
    let brain = session.brain(target)?;
    let lines = session.api()?.simulator_logs(&brain, version, sim)?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
