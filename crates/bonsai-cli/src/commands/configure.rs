//! Profile commands: `configure` and `switch`

use colored::Colorize;

use crate::context::Session;
use crate::error::Result;
use crate::interactive;
use crate::output;

/// Page where users create access keys for `api_url`.
pub fn access_key_url(api_url: &str) -> String {
    if api_url == bonsai_api::DEFAULT_API_URL {
        "https://beta.bons.ai/accounts/settings/key".to_string()
    } else {
        format!("{}/accounts/settings/key", api_url.trim_end_matches('/'))
    }
}

/// Run the configure command
///
/// Validates the credentials against the service before saving them.
pub fn run_configure(
    session: &mut Session,
    username: Option<String>,
    access_key: Option<String>,
    show: bool,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => interactive::prompt_username()?,
    };
    let access_key = match access_key {
        Some(access_key) => access_key,
        None => {
            println!(
                "You can get this access key from {}",
                access_key_url(&session.config.url())
            );
            interactive::prompt_access_key()?
        }
    };

    println!("Validating access key...");
    let api = bonsai_api::BonsaiApi::with_timeout(
        &access_key,
        &username,
        &session.config.url(),
        session.timeout,
    )?;
    api.validate()?;

    session.config.set_credentials(&username, &access_key);
    session.config.save()?;
    println!("{}", "Success!".green());

    if show {
        output::print_profile(session.config.profile_name(), &session.config.stored_profile());
    }
    Ok(())
}

/// Run the switch command
pub fn run_switch(
    session: &mut Session,
    profile: Option<&str>,
    url: Option<&str>,
    show: bool,
) -> Result<()> {
    let Some(profile) = profile else {
        if show {
            output::print_profile(session.config.profile_name(), &session.config.stored_profile());
        } else {
            list_profiles(session);
        }
        return Ok(());
    };

    session.config.switch(profile, url)?;
    session.config.save()?;

    println!(
        "{} Switched to {}. Commands will target: {}",
        "Success!".green(),
        profile.cyan(),
        session.config.url()
    );
    if show {
        output::print_profile(session.config.profile_name(), &session.config.stored_profile());
    }
    Ok(())
}

fn list_profiles(session: &Session) {
    let active = session.config.profile_name();
    println!("{}", "Available Profiles:".bold());
    let mut any = false;
    for name in session.config.profile_names() {
        any = true;
        if name == active {
            println!("  {} {}", name.green(), "(active)".dimmed());
        } else {
            println!("  {name}");
        }
    }
    if !any {
        println!("  {} {}", active.green(), "(active, not yet configured)".dimmed());
    }
}
