//! Per-invocation state shared by the commands
//!
//! Holds the loaded profile configuration, the request timeout and the
//! directory the command runs in. Commands build their API client and
//! resolve their target brain through it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bonsai_api::{BonsaiApi, Config};
use bonsai_project::{DEFAULT_MANIFEST, ProjectFile, resolve_brain_name};

use crate::cli::Target;
use crate::error::Result;

#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub timeout: Duration,
    pub cwd: PathBuf,
}

impl Session {
    pub fn new(config: Config, timeout: Duration, cwd: impl Into<PathBuf>) -> Self {
        Self {
            config,
            timeout,
            cwd: cwd.into(),
        }
    }

    /// Load the configuration, selecting `profile` for this run if given.
    pub fn load(profile: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(profile) = profile {
            config.select_profile(profile)?;
        }
        Ok(Self::new(config, timeout, std::env::current_dir()?))
    }

    /// API client for the active profile.
    pub fn api(&self) -> Result<BonsaiApi> {
        let credentials = self.config.credentials()?;
        Ok(BonsaiApi::from_credentials(&credentials, self.timeout)?)
    }

    /// Brain a command targets: `--brain`, else the default brain of the
    /// `--project` directory, else that of the working directory.
    pub fn brain(&self, target: &Target) -> Result<String> {
        let project = target.project.as_deref().map(|p| self.resolve(p));
        Ok(resolve_brain_name(
            target.brain.as_deref(),
            project.as_deref(),
            &self.cwd,
        )?)
    }

    /// Project directory: `--project` if given, else the working directory.
    pub fn project_dir(&self, project: Option<&Path>) -> PathBuf {
        project
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// The manifest of the project, loaded (empty if it does not exist).
    ///
    /// `project` may name the manifest itself or its directory.
    pub fn project_file(&self, project: Option<&Path>) -> Result<ProjectFile> {
        match project {
            Some(project) => Ok(ProjectFile::from_file_or_dir(self.resolve(project))?),
            None => Ok(ProjectFile::load(self.cwd.join(DEFAULT_MANIFEST))?),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonsai_api::EnvOverrides;
    use bonsai_project::DotBrains;
    use bonsai_test_utils::TestProject;

    fn session(cwd: &Path) -> Session {
        let config = Config::load_from(cwd.join("missing.toml"), EnvOverrides::default()).unwrap();
        Session::new(config, Duration::from_secs(1), cwd)
    }

    #[test]
    fn explicit_brain_wins() {
        let project = TestProject::new();
        let target = Target {
            brain: Some("cartpole".to_string()),
            project: None,
        };
        assert_eq!(session(project.root()).brain(&target).unwrap(), "cartpole");
    }

    #[test]
    fn default_brain_of_relative_project_dir() {
        let project = TestProject::new();
        let sub = project.mkdir("sub");
        DotBrains::load(&sub).unwrap().add("mountaincar").unwrap();

        let target = Target {
            brain: None,
            project: Some(PathBuf::from("sub")),
        };
        assert_eq!(session(project.root()).brain(&target).unwrap(), "mountaincar");
    }

    #[test]
    fn missing_brain_name_is_reported() {
        let project = TestProject::new();
        let err = session(project.root()).brain(&Target::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing brain name. Specify a name with `--brain NAME`."
        );
    }

    #[test]
    fn api_requires_credentials() {
        let project = TestProject::new();
        let err = session(project.root()).api().unwrap_err();
        assert!(err.to_string().contains("Run 'bonsai configure'"));
    }
}
