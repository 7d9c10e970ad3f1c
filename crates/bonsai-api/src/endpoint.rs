//! Request paths of the BRAIN REST API
//!
//! Each endpoint names its path parameters; values are percent-encoded as
//! individual path segments so a brain called `a/b` cannot address another
//! resource.

use url::Url;

use crate::{Error, Result};

const API_VERSION: &str = "v1";

/// A BRAIN API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/v1/validate`
    Validate,
    /// `/v1/{user}`
    ListBrains { user: &'a str },
    /// `/v1/{user}/brains`
    CreateBrain { user: &'a str },
    /// `/v1/{user}/{brain}`: details, edit and delete
    Brain { user: &'a str, brain: &'a str },
    /// `/v1/{user}/{brain}/{version}`
    BrainVersion {
        user: &'a str,
        brain: &'a str,
        version: &'a str,
    },
    /// `/v1/{user}/{brain}/sims`
    Simulators { user: &'a str, brain: &'a str },
    /// `/v1/{user}/{brain}/{version}/sims/{sim}/logs`
    SimulatorLogs {
        user: &'a str,
        brain: &'a str,
        version: &'a str,
        sim: &'a str,
    },
    /// `/v1/{user}/{brain}/status`
    Status { user: &'a str, brain: &'a str },
    /// `/v1/{user}/{brain}/train`
    Train { user: &'a str, brain: &'a str },
    /// `/v1/{user}/{brain}/stop`
    Stop { user: &'a str, brain: &'a str },
    /// `/v1/{user}/{brain}/{version}/resume`
    Resume {
        user: &'a str,
        brain: &'a str,
        version: &'a str,
    },
}

impl<'a> Endpoint<'a> {
    /// Path segments following the API version.
    fn segments(&self) -> Vec<&'a str> {
        match *self {
            Self::Validate => vec!["validate"],
            Self::ListBrains { user } => vec![user],
            Self::CreateBrain { user } => vec![user, "brains"],
            Self::Brain { user, brain } => vec![user, brain],
            Self::BrainVersion {
                user,
                brain,
                version,
            } => vec![user, brain, version],
            Self::Simulators { user, brain } => vec![user, brain, "sims"],
            Self::SimulatorLogs {
                user,
                brain,
                version,
                sim,
            } => vec![user, brain, version, "sims", sim, "logs"],
            Self::Status { user, brain } => vec![user, brain, "status"],
            Self::Train { user, brain } => vec![user, brain, "train"],
            Self::Stop { user, brain } => vec![user, brain, "stop"],
            Self::Resume {
                user,
                brain,
                version,
            } => vec![user, brain, version, "resume"],
        }
    }

    /// Absolute URL of this endpoint under `base`.
    ///
    /// Any path already present on `base` is kept as a prefix.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut joined = base.clone();
        joined.set_query(None);
        joined.set_fragment(None);
        {
            let mut path = joined.path_segments_mut().map_err(|()| Error::InvalidUrl {
                url: base.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?;
            path.pop_if_empty().push(API_VERSION).extend(self.segments());
        }
        Ok(joined)
    }
}
