//! Admin session cookie handling and logout.

use reqwest::{header::COOKIE, Client};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

/// Cookie the server sets after a verified login.
pub const SESSION_COOKIE: &str = "admin-cookie";

pub const LOGOUT_PATH: &str = "/admin/logout";

/// Extract the session value from one `Set-Cookie` header.
///
/// Empty values (the server clearing the cookie) are ignored.
#[must_use]
pub fn cookie_value(set_cookie: &str) -> Option<SecretString> {
    let pair = set_cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim() != SESSION_COOKIE {
        return None;
    }
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        None
    } else {
        Some(SecretString::from(value.to_string()))
    }
}

/// End the server session identified by `session`.
///
/// The server answers a logout with a redirect (or `HX-Redirect` and 200), so
/// redirects are followed and any final 2xx counts as success.
///
/// # Errors
/// Returns an error if the request fails or the server answers non-2xx.
#[instrument(skip(client, session))]
pub async fn logout(client: &Client, base_url: &Url, session: &SecretString) -> anyhow::Result<()> {
    let url = base_url.join(LOGOUT_PATH)?;

    let response = client
        .post(url.clone())
        .header(COOKIE, format!("{SESSION_COOKIE}={}", session.expose_secret()))
        .header("HX-Request", "true")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("{} - {}, {}", url, status, body.trim()));
    }

    debug!("session cleared");

    Ok(())
}
