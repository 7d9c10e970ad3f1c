//! Training commands: `train start|stop|status|resume`

use bonsai_api::Document;
use bonsai_api::response::{STATE_ERROR, state};
use colored::Colorize;
use serde_json::Value;

use crate::cli::Target;
use crate::context::Session;
use crate::error::{CliError, Result};
use crate::output;

/// Run the train start command
///
/// Refuses to start a brain the service reports in the error state.
pub fn run_train_start(session: &Session, target: &Target, remote: bool, json: bool) -> Result<()> {
    let brain = session.brain(target)?;
    let api = session.api()?;

    tracing::debug!(brain = %brain, "getting status");
    let status = api.brain_status(&brain)?;
    if state(&status) == Some(STATE_ERROR) {
        return Err(CliError::user(
            "Unable to start training because the brain is in an Error state. \
             Please contact Bonsai Support. Visit http://bons.ai/contact-us for more \
             information on how to contact us.",
        ));
    }

    let response = api.start_training(&brain, remote)?;
    report(&brain, &response, json, "Training started for")
}

pub fn run_train_stop(session: &Session, target: &Target, json: bool) -> Result<()> {
    let brain = session.brain(target)?;
    let response = session.api()?.stop_training(&brain)?;
    report(&brain, &response, json, "Training stopped for")
}

/// Run the train status command
pub fn run_train_status(session: &Session, target: &Target, json: bool) -> Result<()> {
    let brain = session.brain(target)?;
    let status = session.api()?.brain_status(&brain)?;
    if json {
        return output::print_json(&status);
    }

    println!("Status for {}:", brain.cyan());
    for line in status_rows(&status) {
        println!("{line}");
    }
    Ok(())
}

pub fn run_train_resume(
    session: &Session,
    target: &Target,
    version: &str,
    remote: bool,
    json: bool,
) -> Result<()> {
    let brain = session.brain(target)?;
    let response = session.api()?.resume_training(&brain, version, remote)?;
    report(&brain, &response, json, "Training resumed for")
}

fn report(brain: &str, response: &Document, json: bool, action: &str) -> Result<()> {
    if json {
        return output::print_json(response);
    }
    if let Some(url) = response.get("simulator_predictions_url").and_then(Value::as_str) {
        tracing::debug!(url, "connect simulators here for predictions once training completes");
    }
    output::ok(format!("{action} {}.", brain.cyan()));
    Ok(())
}

/// `KEY  VALUE` lines in key order.
fn status_rows(status: &Document) -> Vec<String> {
    let width = status.keys().map(String::len).max().unwrap_or(0).max("KEY".len());
    let mut rows = vec![format!("{:<width$}  VALUE", "KEY")];
    // Document keys are already sorted
    for (key, value) in status {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        rows.push(format!("{key:<width$}  {value}"));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_rows_are_sorted_and_aligned() {
        let status = json!({"state": "Stopped", "episode": 12})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            status_rows(&status),
            vec!["KEY      VALUE", "episode  12", "state    Stopped"]
        );
    }
}
