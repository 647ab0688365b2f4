use crate::login::{
    challenge::NONCE_FIELD, fetch_challenge, http_client, session::SESSION_COOKIE, FlowError,
    FormFields, LocalKeySigner, LoginFlow, Outcome, PatchPort, WriterPatcher,
};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub url: Url,
    pub secret_key: SecretString,
    pub nonce: Option<String>,
    pub show_cookie: bool,
}

/// Execute the login action, rendering fragments on stdout.
///
/// # Errors
/// Returns an error if the challenge cannot be obtained, the key is invalid,
/// or the login does not succeed.
pub async fn execute(args: Args) -> Result<()> {
    let show_cookie = args.show_cookie;

    match run(args, WriterPatcher::new(std::io::stdout())).await? {
        Outcome::Navigated { location, session } => {
            println!("{location}");
            if show_cookie {
                if let Some(session) = session {
                    println!("{SESSION_COOKIE}={}", session.expose_secret());
                }
            }
        }
        Outcome::Patched { selector, .. } => {
            debug!("login response rendered into {selector}");
        }
    }

    Ok(())
}

/// Obtain the challenge, sign it and submit it once.
///
/// A fragment carried by a non-2xx response is rendered first and then
/// reported as an error.
///
/// # Errors
/// Returns an error for every attempt that did not succeed.
pub async fn run<P: PatchPort>(args: Args, patcher: P) -> Result<Outcome> {
    let client = http_client().context("Failed to build HTTP client")?;

    let fields: FormFields = if let Some(nonce) = args.nonce {
        HashMap::from([(NONCE_FIELD.to_string(), nonce)])
    } else {
        fetch_challenge(&client, &args.url)
            .await
            .context("Failed to fetch login challenge")?
            .into_form()
    };

    let signer = LocalKeySigner::from_hex(&args.secret_key)?;
    info!(pubkey = %signer.pubkey(), "signing login challenge");

    let flow = LoginFlow::new(client, args.url, signer, patcher);

    match flow.submit(&fields).await {
        Ok(Outcome::Patched { status, selector }) if !(200..300).contains(&status) => Err(anyhow!(
            "login rejected with status {status}, details rendered into {selector}"
        )),
        Ok(outcome) => Ok(outcome),
        Err(FlowError::Rejected { status, body }) => {
            Err(anyhow!("login rejected with status {status}: {}", body.trim()))
        }
        Err(e) => Err(e.into()),
    }
}
