//! Brain commands: `list`, `create`, `delete` and `push`

use bonsai_api::response::{STATE_IN_PROGRESS, state};
use bonsai_api::{BrainList, Document};
use bonsai_project::{DotBrains, Error as ProjectError, ProjectFile};
use colored::Colorize;
use serde_json::Value;

use crate::cli::Target;
use crate::context::Session;
use crate::error::{CliError, Result};
use crate::output;

/// Run the list command
pub fn run_list(session: &Session, json: bool) -> Result<()> {
    let brains = session.api()?.list_brains()?;
    if json {
        return output::print_json(&brains);
    }

    if brains.brains.is_empty() {
        println!("The current user has not created any brains.");
        return Ok(());
    }

    // a broken .brains only loses the marker
    let default = DotBrains::load(&session.cwd)
        .ok()
        .and_then(|d| d.default_brain().map(|b| b.name.clone()));

    for line in brain_rows(&brains, default.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

/// One line per brain, the default brain marked with `*`.
fn brain_rows(brains: &BrainList, default: Option<&str>) -> Vec<String> {
    let width = brains
        .brains
        .iter()
        .map(|b| b.name.len() + 1)
        .chain(["BRAIN".len()])
        .max()
        .unwrap_or(0);

    let mut rows = vec![format!("{:<width$}  {}", "BRAIN", "State")];
    for brain in &brains.brains {
        if Some(brain.name.as_str()) == default {
            let name = format!("{}*", brain.name);
            rows.push(format!(
                "{}  {}",
                format!("{name:<width$}").bold(),
                brain.state.bold()
            ));
        } else {
            rows.push(format!("{:<width$}  {}", brain.name, brain.state));
        }
    }
    rows
}

/// Run the create command
///
/// Creates the brain from the project's files unless it already exists,
/// then records it as the project's default brain and writes the project
/// file with defaults applied.
pub fn run_create(
    session: &Session,
    brain_name: Option<&str>,
    project: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let brain = match brain_name {
        Some(name) => name.to_string(),
        None => DotBrains::load(&session.cwd)?
            .default_brain()
            .map(|b| b.name.clone())
            .ok_or_else(|| {
                CliError::user("Missing brain name. Usage: bonsai create <BRAIN_NAME>")
            })?,
    };

    let mut project_file = session.project_file(project).map_err(|e| {
        e.context(&format!(
            "Bonsai Create Failed.\nFailed to load project file '{}'",
            session.project_dir(project).display()
        ))
    })?;
    validate(&project_file, "Bonsai Create Failed.")?;

    let api = session.api()?;
    if api.brain_exists(&brain)? {
        println!("Brain {brain} exists.");
        println!("Run 'bonsai push' to push new inkling and training source into {brain}");
    } else {
        tracing::debug!(brain = %brain, "creating brain");
        let response = api.create_brain_from_project(&brain, &project_file)?;
        if json {
            output::print_json(&response)?;
        } else {
            output::ok(format!("Brain {} created.", brain.cyan()));
        }
    }

    DotBrains::load(project_file.directory().to_native())?.add_or_set_default(&brain)?;
    project_file.apply_defaults();
    project_file.save()?;
    Ok(())
}

/// Run the delete command
pub fn run_delete(session: &Session, brain_name: &str) -> Result<()> {
    let api = session.api()?;
    if !api.list_brains()?.contains(brain_name) {
        return Err(CliError::user(format!(
            "Brain {brain_name} does not exist. No action was taken."
        )));
    }
    api.delete_brain(brain_name)?;
    output::ok(format!("Brain {} deleted.", brain_name.cyan()));
    Ok(())
}

/// Run the push command
///
/// Uploads the resolved project files to the brain. Refuses while the
/// brain is training.
pub fn run_push(session: &Session, target: &Target, json: bool) -> Result<()> {
    let brain = session.brain(target)?;
    let directory = session.project_dir(target.project.as_deref());

    let Some(path) = ProjectFile::find(&directory) else {
        return Err(CliError::user(format!(
            "Unable to locate project file (.bproj) in directory={}",
            directory.display()
        )));
    };
    tracing::debug!(path = %path.display(), "reading project file");

    let project_file = ProjectFile::load(&path).map_err(|e| {
        CliError::from(e).context(&format!(
            "Bonsai Push Failed.\nFailed to load project file '{}'",
            path.display()
        ))
    })?;
    validate(&project_file, "Bonsai Push Failed.")?;

    if !json {
        let files = project_file.list_paths()?;
        println!("Uploading {} file(s) to {}... ", files.len() + 1, brain);
        tracing::debug!(?files, "uploading files");
    }

    let api = session.api()?;
    let status = api.brain_status(&brain)?;
    if state(&status) == Some(STATE_IN_PROGRESS) {
        return Err(CliError::user(
            "Can't push while training. Please stop training first.",
        ));
    }

    let response = api.edit_brain(&brain, &project_file)?;
    if json {
        return output::print_json(&response);
    }

    if let Some(compile) = response.get("ink_compile") {
        let inkling = project_file.inkling_file()?;
        for line in compile_report(compile, &inkling) {
            println!("{line}");
        }
    }

    let files = uploaded_files(&response);
    println!(
        "Push succeeded. {} updated with {} files.",
        brain.cyan(),
        files.len()
    );
    for file in files {
        println!("{file}");
    }
    Ok(())
}

/// Validate the manifest; size violations are reported under `heading`.
fn validate(project_file: &ProjectFile, heading: &str) -> Result<()> {
    match project_file.validate() {
        Ok(()) => Ok(()),
        Err(e @ ProjectError::FileTooLarge { .. }) => Err(CliError::from(e).context(heading)),
        Err(e) => Err(e.into()),
    }
}

/// Inkling compiler errors and warnings from a push response.
fn compile_report(compile: &Value, inkling: &str) -> Vec<String> {
    let list = |key: &str| compile[key].as_array().cloned().unwrap_or_default();
    let errors = list("errors");
    let warnings = list("warnings");
    if errors.is_empty() && warnings.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![format!(
        "\n{} Errors, {} Warnings in {inkling}",
        errors.len(),
        warnings.len()
    )];
    for item in errors.iter().chain(&warnings) {
        lines.push(format!(
            "{} {} (line {}, column {})",
            plain(&item["code"]),
            plain(&item["text"]),
            plain(&item["line"]),
            plain(&item["column"])
        ));
    }
    lines.push(String::new());
    lines
}

fn uploaded_files(response: &Document) -> Vec<String> {
    response
        .get("files")
        .and_then(Value::as_array)
        .map(|files| files.iter().map(plain).collect())
        .unwrap_or_default()
}

/// A JSON value as text, strings unquoted.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonsai_api::BrainSummary;
    use serde_json::json;

    fn summary(name: &str, state: &str) -> BrainSummary {
        BrainSummary {
            name: name.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn rows_align_names() {
        colored::control::set_override(false);
        let list = BrainList {
            brains: vec![summary("cartpole", "Complete"), summary("mc", "Error")],
        };
        assert_eq!(
            brain_rows(&list, Some("mc")),
            vec![
                "BRAIN      State",
                "cartpole   Complete",
                "mc*        Error",
            ]
        );
    }

    #[test]
    fn compile_report_lists_errors_then_warnings() {
        let compile = json!({
            "errors": [{"code": "E1", "text": "bad", "line": 3, "column": 7}],
            "warnings": [{"code": "W2", "text": "meh", "line": 9, "column": 1}]
        });
        assert_eq!(
            compile_report(&compile, "cartpole.ink"),
            vec![
                "\n1 Errors, 1 Warnings in cartpole.ink".to_string(),
                "E1 bad (line 3, column 7)".to_string(),
                "W2 meh (line 9, column 1)".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn clean_compile_prints_nothing() {
        assert!(compile_report(&json!({"errors": [], "warnings": []}), "x.ink").is_empty());
    }

    #[test]
    fn uploaded_files_from_response() {
        let mut response = Document::new();
        response.insert("files".to_string(), json!(["a.ink", "b.py"]));
        assert_eq!(uploaded_files(&response), vec!["a.ink", "b.py"]);
        assert!(uploaded_files(&Document::new()).is_empty());
    }
}
