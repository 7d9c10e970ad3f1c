//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based input.

use dialoguer::{Input, Password};

use crate::error::Result;

pub fn prompt_username() -> Result<String> {
    Ok(Input::new().with_prompt("Username").interact_text()?)
}

/// Ask for the access key without echoing it.
pub fn prompt_access_key() -> Result<String> {
    Ok(Password::new()
        .with_prompt("Access Key (typing will be hidden)")
        .interact()?)
}
