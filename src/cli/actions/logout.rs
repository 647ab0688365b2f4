use crate::login::{http_client, session};
use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub url: Url,
    pub cookie: SecretString,
}

/// Execute the logout action.
///
/// # Errors
/// Returns an error if the server does not acknowledge the logout.
pub async fn execute(args: Args) -> Result<()> {
    let client = http_client().context("Failed to build HTTP client")?;

    session::logout(&client, &args.url, &args.cookie)
        .await
        .context("Failed to close admin session")?;

    println!("session closed");

    Ok(())
}
