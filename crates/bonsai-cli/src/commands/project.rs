//! Project file commands: `project init|add|remove|files|validate`

use std::path::Path;

use colored::Colorize;

use crate::context::Session;
use crate::error::Result;
use crate::output;

/// Run the project init command
///
/// Writes a project file with the default patterns. An existing project
/// file is left alone.
pub fn run_project_init(session: &Session, project: Option<&Path>) -> Result<()> {
    let dir = session.project_dir(project);
    std::fs::create_dir_all(&dir)?;

    let mut project_file = session.project_file(Some(dir.as_path()))?;
    if project_file.exists() {
        output::ok(format!(
            "Project file already exists at {}",
            project_file.path().to_string().dimmed()
        ));
        return Ok(());
    }

    project_file.apply_defaults();
    project_file.save()?;
    output::ok(format!("Created {}", project_file.path().to_string().cyan()));
    Ok(())
}

/// Run the project add command
pub fn run_project_add(session: &Session, patterns: &[String], project: Option<&Path>) -> Result<()> {
    let mut project_file = session.project_file(project)?;
    for pattern in patterns {
        if project_file.add_file(pattern.as_str()) {
            output::ok(format!("Added {}", pattern.cyan()));
        } else {
            output::ok(format!("{} is already listed", pattern.cyan()));
        }
    }
    project_file.save()?;
    Ok(())
}

/// Run the project remove command
pub fn run_project_remove(session: &Session, patterns: &[String], project: Option<&Path>) -> Result<()> {
    let mut project_file = session.project_file(project)?;
    for pattern in patterns {
        if project_file.remove_file(pattern) {
            output::ok(format!("Removed {}", pattern.cyan()));
        } else {
            eprintln!(
                "{} {} is not listed in {}",
                "warning:".yellow().bold(),
                pattern,
                project_file.file_name()
            );
        }
    }
    project_file.save()?;
    Ok(())
}

/// Run the project files command
///
/// Prints the project-relative paths that a push would upload, not
/// counting the project file itself.
pub fn run_project_files(session: &Session, project: Option<&Path>, json: bool) -> Result<()> {
    let project_file = session.project_file(project)?;
    let files = project_file.list_paths()?;
    if json {
        return output::print_json(&files);
    }
    for file in &files {
        println!("{file}");
    }
    Ok(())
}

/// Run the project validate command
pub fn run_project_validate(session: &Session, project: Option<&Path>) -> Result<()> {
    let project_file = session.project_file(project)?;
    project_file.validate()?;
    let inkling = project_file.inkling_file()?;
    output::ok(format!(
        "{} is valid. Inkling file: {}",
        project_file.file_name(),
        inkling.cyan()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bonsai_api::{Config, EnvOverrides};
    use bonsai_project::ProjectFile;
    use bonsai_test_utils::TestProject;
    use serde_json::json;

    fn session(project: &TestProject) -> Session {
        let config =
            Config::load_from(project.root().join("config.toml"), EnvOverrides::default()).unwrap();
        Session::new(config, Duration::from_secs(1), project.root())
    }

    #[test]
    fn init_writes_defaults() {
        let project = TestProject::new();
        run_project_init(&session(&project), None).unwrap();
        assert_eq!(
            project.read_manifest(),
            json!({"files": ["*.ink", "*.py"], "training": {"simulator": "custom"}})
        );
    }

    #[test]
    fn init_keeps_existing_project_file() {
        let project = TestProject::new();
        project.write_manifest(&["model.ink"]);
        run_project_init(&session(&project), None).unwrap();
        assert_eq!(project.read_manifest()["files"], json!(["model.ink"]));
    }

    #[test]
    fn add_and_remove_patterns() {
        let project = TestProject::new();
        project.write_manifest(&["a.ink"]);
        let session = session(&project);

        run_project_add(&session, &["src".to_string(), "a.ink".to_string()], None).unwrap();
        assert_eq!(project.read_manifest()["files"], json!(["a.ink", "src"]));

        run_project_remove(&session, &["a.ink".to_string(), "nope".to_string()], None).unwrap();
        assert_eq!(project.read_manifest()["files"], json!(["src"]));
    }

    #[test]
    fn validate_requires_single_inkling_file() {
        let project = TestProject::new();
        project.write_manifest(&["*.ink"]);
        project.write_file("a.ink", "inkling");
        project.write_file("b.ink", "inkling");

        let err = run_project_validate(&session(&project), None).unwrap_err();
        assert!(err.to_string().contains("2 total"));
    }

    #[test]
    fn init_in_project_subdirectory() {
        let project = TestProject::new();
        run_project_init(&session(&project), Some(Path::new("nested"))).unwrap();
        let pf = ProjectFile::from_file_or_dir(project.root().join("nested")).unwrap();
        assert!(pf.exists());
    }
}
