//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary executes.

use crate::cli::actions::{login, logout, pubkey, Action};
use crate::cli::commands::{ARG_COOKIE, ARG_NONCE, ARG_SECRET_KEY, ARG_SHOW_COOKIE, ARG_URL};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use url::Url;

fn url(matches: &ArgMatches) -> Result<Url> {
    matches
        .get_one::<Url>(ARG_URL)
        .cloned()
        .context("missing required argument: --url")
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    matches
        .get_one::<String>(id)
        .map(|s| SecretString::from(s.clone()))
        .with_context(|| format!("missing required argument: --{id}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(login::Args {
            url: url(sub_m)?,
            secret_key: secret(sub_m, ARG_SECRET_KEY)?,
            nonce: sub_m.get_one::<String>(ARG_NONCE).cloned(),
            show_cookie: sub_m.get_flag(ARG_SHOW_COOKIE),
        })),
        Some(("logout", sub_m)) => Ok(Action::Logout(logout::Args {
            url: url(sub_m)?,
            cookie: secret(sub_m, ARG_COOKIE)?,
        })),
        Some(("pubkey", sub_m)) => Ok(Action::Pubkey(pubkey::Args {
            secret_key: secret(sub_m, ARG_SECRET_KEY)?,
        })),
        _ => Err(anyhow!("unknown subcommand")),
    }
}
