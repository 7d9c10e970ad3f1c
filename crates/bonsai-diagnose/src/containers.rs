//! Managed simulator container groups
//!
//! [`ContainerInstanceClient`] reads container groups through the Azure
//! Resource Manager REST API.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::azure::AzureHttp;
use crate::{Result, url_with_segments};

/// Azure Resource Manager endpoint.
pub const RESOURCE_MANAGER_URL: &str = "https://management.azure.com";
const API_VERSION: &str = "2021-09-01";

/// Restart count summed over the containers of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupRestarts {
    pub restarts: u64,
    /// Number of containers in the group
    pub instances: usize,
}

/// Read access to the container groups of a resource group.
pub trait ContainerGroups {
    /// Names of all groups in `resource_group`.
    fn list_groups(&self, resource_group: &str) -> Result<Vec<String>>;

    /// Restart details of one group.
    fn group_restarts(&self, resource_group: &str, group: &str) -> Result<GroupRestarts>;
}

#[derive(Debug, Clone)]
pub struct ContainerInstanceClient {
    http: AzureHttp,
    base_url: Url,
    subscription_id: String,
}

impl ContainerInstanceClient {
    pub fn new(subscription_id: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: AzureHttp::new("Container Instances", token, timeout)?,
            base_url: Url::parse(RESOURCE_MANAGER_URL)?,
            subscription_id: subscription_id.to_string(),
        })
    }

    /// Point the client at another endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    fn groups_url(&self, resource_group: &str, group: Option<&str>) -> Result<Url> {
        let mut segments = vec![
            "subscriptions",
            self.subscription_id.as_str(),
            "resourceGroups",
            resource_group,
            "providers",
            "Microsoft.ContainerInstance",
            "containerGroups",
        ];
        segments.extend(group);
        let mut url = url_with_segments(&self.base_url, &segments)?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }
}

impl ContainerGroups for ContainerInstanceClient {
    fn list_groups(&self, resource_group: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next = Some(self.groups_url(resource_group, None)?.to_string());

        // results are paged through nextLink
        while let Some(url) = next.take() {
            let page = self.http.get(&url)?;
            let entries = page["value"]
                .as_array()
                .ok_or_else(|| self.http.invalid("container group list has no \"value\" array"))?;
            names.extend(
                entries
                    .iter()
                    .filter_map(|g| g["name"].as_str())
                    .map(str::to_string),
            );
            next = page["nextLink"].as_str().map(str::to_string);
        }

        tracing::debug!(resource_group, count = names.len(), "listed container groups");
        Ok(names)
    }

    fn group_restarts(&self, resource_group: &str, group: &str) -> Result<GroupRestarts> {
        let url = self.groups_url(resource_group, Some(group))?;
        let detail = self.http.get(url.as_str())?;
        Ok(restarts_of(&detail))
    }
}

/// Sum `instanceView.restartCount` over the containers of a group
/// document. Containers without an instance view count zero.
fn restarts_of(group: &Value) -> GroupRestarts {
    let containers = group
        .pointer("/properties/containers")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let restarts = containers
        .iter()
        .filter_map(|c| c.pointer("/properties/instanceView/restartCount"))
        .filter_map(Value::as_u64)
        .sum();

    GroupRestarts {
        restarts,
        instances: containers.len(),
    }
}
