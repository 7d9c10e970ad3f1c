//! Profile configuration
//!
//! Credentials and the service url are kept in a TOML file, by default
//! `~/.bonsai/config.toml`:
//!
//! ```toml
//! profile = "default"
//!
//! [profiles.default]
//! username = "bill"
//! access_key = "00000000-1111-2222-3333-444444444444"
//! url = "https://api.bons.ai"
//! ```
//!
//! `BONSAI_CONFIG` points at another file. `BONSAI_USERNAME`,
//! `BONSAI_ACCESS_KEY` and `BONSAI_API_URL` override the active profile
//! without being written back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bonsai_fs::{ConfigStore, Format, NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Service url used when a profile does not name one.
pub const DEFAULT_API_URL: &str = "https://api.bons.ai";
/// Name of the profile created on first use.
pub const DEFAULT_PROFILE: &str = "default";

pub const CONFIG_ENV: &str = "BONSAI_CONFIG";
pub const USERNAME_ENV: &str = "BONSAI_USERNAME";
pub const ACCESS_KEY_ENV: &str = "BONSAI_ACCESS_KEY";
pub const API_URL_ENV: &str = "BONSAI_API_URL";

fn default_profile_name() -> String {
    DEFAULT_PROFILE.to_string()
}

/// One named set of credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // Resources inspected by `bonsai diagnose`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_workspace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default = "default_profile_name")]
    profile: String,
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            profile: default_profile_name(),
            profiles: BTreeMap::new(),
        }
    }
}

/// Values taken from the environment, applied over the active profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub username: Option<String>,
    pub access_key: Option<String>,
    pub url: Option<String>,
}

impl EnvOverrides {
    /// Read the `BONSAI_*` variables. Empty values are ignored.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            username: var(USERNAME_ENV),
            access_key: var(ACCESS_KEY_ENV),
            url: var(API_URL_ENV),
        }
    }
}

/// Credentials required to build an API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub access_key: String,
    pub url: String,
}

/// The loaded configuration file plus environment overrides.
#[derive(Debug, Clone)]
pub struct Config {
    path: NormalizedPath,
    file: ConfigFile,
    env: EnvOverrides,
    /// Profile selected for this run only (`--profile`)
    selected: Option<String>,
}

impl Config {
    /// Load from `BONSAI_CONFIG` or `~/.bonsai/config.toml`, applying
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_path()?, EnvOverrides::from_env())
    }

    /// Load from an explicit path. A missing file yields an empty
    /// configuration; malformed TOML is an error.
    pub fn load_from(path: impl AsRef<Path>, env: EnvOverrides) -> Result<Self> {
        let path = NormalizedPath::new(path.as_ref());
        let file = match io::read_text_optional(&path) {
            Some(text) => ConfigStore::new().parse(&path, &text, Format::Toml)?,
            None => ConfigFile::default(),
        };
        tracing::debug!(path = %path, profile = %file.profile, "loaded configuration");
        Ok(Self {
            path,
            file,
            env,
            selected: None,
        })
    }

    /// Use `name` as the active profile for this process without saving.
    pub fn select_profile(&mut self, name: &str) -> Result<()> {
        if !self.has_profile(name) {
            return Err(Error::ProfileNotFound {
                name: name.to_string(),
            });
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Name of the active profile.
    pub fn profile_name(&self) -> &str {
        self.selected.as_deref().unwrap_or(&self.file.profile)
    }

    /// Names of all stored profiles.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.file.profiles.keys().map(String::as_str)
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.file.profiles.contains_key(name)
    }

    /// The stored active profile, without environment overrides.
    pub fn stored_profile(&self) -> Profile {
        self.file
            .profiles
            .get(self.profile_name())
            .cloned()
            .unwrap_or_default()
    }

    /// The active profile with environment overrides applied.
    pub fn profile(&self) -> Profile {
        let mut profile = self.stored_profile();
        if let Some(username) = &self.env.username {
            profile.username = Some(username.clone());
        }
        if let Some(access_key) = &self.env.access_key {
            profile.access_key = Some(access_key.clone());
        }
        if let Some(url) = &self.env.url {
            profile.url = Some(url.clone());
        }
        profile
    }

    /// Effective service url.
    pub fn url(&self) -> String {
        self.profile()
            .url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Username and access key of the active profile.
    ///
    /// Reports every missing setting at once.
    pub fn credentials(&self) -> Result<Credentials> {
        let profile = self.profile();
        let mut messages = Vec::new();
        if profile.access_key.is_none() {
            messages.push("Your access key is not configured.");
        }
        if profile.username.is_none() {
            messages.push("Your username is not configured.");
        }
        match (profile.username, profile.access_key) {
            (Some(username), Some(access_key)) => Ok(Credentials {
                username,
                access_key,
                url: self.url(),
            }),
            _ => {
                messages.push("Run 'bonsai configure' to update required configuration.");
                Err(Error::MissingConfiguration(messages.join("\n")))
            }
        }
    }

    /// Store credentials in the active profile, creating it if needed.
    pub fn set_credentials(&mut self, username: &str, access_key: &str) {
        let profile = self.stored_profile_mut();
        profile.username = Some(username.to_string());
        profile.access_key = Some(access_key.to_string());
    }

    /// Make `name` the persistent active profile, optionally setting its url.
    ///
    /// A profile that does not exist yet can only be created together with
    /// a url.
    pub fn switch(&mut self, name: &str, url: Option<&str>) -> Result<()> {
        if !self.has_profile(name) && url.is_none() {
            return Err(Error::MissingConfiguration(
                "Profile not found.\nPlease provide a url with the --url option for new profiles"
                    .to_string(),
            ));
        }
        self.file.profile = name.to_string();
        self.selected = None;
        let profile = self.stored_profile_mut();
        if let Some(url) = url {
            profile.url = Some(url.to_string());
        }
        Ok(())
    }

    fn stored_profile_mut(&mut self) -> &mut Profile {
        let name = self.profile_name().to_string();
        self.file.profiles.entry(name).or_default()
    }

    /// Write the configuration file. Environment overrides are not saved.
    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save_as(&self.path, &self.file, Format::Toml)?;
        tracing::debug!(path = %self.path, "saved configuration");
        Ok(())
    }
}

/// Location of the configuration file.
pub fn default_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
    Ok(home.join(".bonsai").join("config.toml"))
}
