//! What to diagnose and where to find its telemetry

use std::path::{Path, PathBuf};

use bonsai_api::BrainVersion;
use chrono::{DateTime, TimeZone};

use crate::{Error, Result};

/// Directory under the home directory that collects diagnostic runs.
pub const LOG_DIR_NAME: &str = ".bonsai_diagnose_logs";

/// Concept ids longer than this are not real ids (some single-concept
/// brains report `<version id>/<concept name>` instead).
const MAX_CONCEPT_ID_LEN: usize = 36;

/// Settings for one diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnoseConfig {
    pub brain_name: String,
    pub brain_version: u64,
    pub concept_name: String,
    /// Bonsai workspace the brain belongs to
    pub workspace_id: String,
    /// Subscription holding the managed simulator containers
    pub subscription_id: String,
    /// Resource group the service creates simulator containers in
    pub resource_group: String,
    /// Log Analytics workspace id (not the resource id)
    pub log_workspace_id: String,
    /// Root directory for saved query results
    pub log_root: PathBuf,
    /// Name of this run's subdirectory under `log_root`
    pub unique_name: String,
    /// Substring identifying this brain version's container groups
    pub container_group: String,
}

impl DiagnoseConfig {
    /// Directory this run writes its results to.
    pub fn run_dir(&self) -> PathBuf {
        self.log_root.join(&self.unique_name)
    }
}

/// `~/.bonsai_diagnose_logs`
pub fn default_log_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(LOG_DIR_NAME))
        .ok_or(Error::NoHomeDirectory)
}

/// A run name made only of the digits of `now`, so runs sort by time.
pub fn unique_run_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d%H%M%S%6f").to_string()
}

/// Container group filter for `concept` of a brain version.
///
/// Group names embed `<version id>_<concept id>`. When the concept has no
/// usable id (missing, empty, or not an id at all) the version id alone is
/// used. Concept names match case-insensitively.
pub fn container_group_name(version: &BrainVersion, concept: &str) -> String {
    let concept = concept.to_lowercase();
    let concept_id = version
        .concepts
        .iter()
        .rev()
        .find(|c| c.name.to_lowercase() == concept)
        .map(|c| c.id.as_str())
        .unwrap_or("");

    if concept_id.is_empty() || concept_id.len() > MAX_CONCEPT_ID_LEN {
        version.id.clone()
    } else {
        format!("{}_{concept_id}", version.id)
    }
}

/// Create `dir` and its parents.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| bonsai_fs::Error::io(dir, e))?;
    Ok(())
}
