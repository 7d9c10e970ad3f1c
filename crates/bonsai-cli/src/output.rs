//! Console output helpers

use bonsai_api::Profile;
use bonsai_fs::to_json_pretty;
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

/// Print `value` as pretty JSON with sorted keys.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json_pretty(value)?);
    Ok(())
}

/// Print a success line.
pub fn ok(message: impl AsRef<str>) {
    println!("{} {}", "OK".green().bold(), message.as_ref());
}

/// `key: value` lines for the settings of a profile. The access key is
/// never printed.
pub fn profile_lines(name: &str, profile: &Profile) -> Vec<String> {
    let mut lines = vec![format!("profile: {name}")];
    let fields = [
        ("username", &profile.username),
        ("url", &profile.url),
        ("subscription_id", &profile.subscription_id),
        ("resource_group", &profile.resource_group),
        ("log_workspace_id", &profile.log_workspace_id),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{key}: {value}"));
        }
    }
    lines
}

pub fn print_profile(name: &str, profile: &Profile) {
    println!();
    println!("{}", "Profile Information".bold());
    println!("--------------------");
    for line in profile_lines(name, profile) {
        println!("{line}");
    }
}
