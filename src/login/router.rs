//! Submission of the signed event and routing of the server reply.
//!
//! Routing rules, in order:
//!
//! | status | `HX-Retarget` | decision                     |
//! |--------|---------------|------------------------------|
//! | any    | present       | patch the target with body   |
//! | 2xx    | absent        | navigate to `/admin`         |
//! | other  | absent        | unhandled, nothing rendered  |
//!
//! An empty or blank `HX-Retarget` value counts as absent.

use super::{challenge::LOGIN_PATH, event::SignedAuthEvent, session};
use reqwest::{header::SET_COOKIE, Client, Response, StatusCode};
use secrecy::SecretString;
use tracing::{debug, instrument, warn};
use url::Url;

/// Response header naming the region a fragment applies to.
pub const RETARGET_HEADER: &str = "HX-Retarget";

/// Destination after a successful login without a fragment.
pub const DASHBOARD_PATH: &str = "/admin";

/// Everything the router needs from a login response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub target: Option<String>,
    pub session: Option<SecretString>,
    pub body: String,
}

#[derive(Debug)]
pub enum Decision {
    Navigate {
        path: &'static str,
        session: Option<SecretString>,
    },
    Patch {
        status: StatusCode,
        target: String,
        html: String,
    },
    Unhandled {
        status: StatusCode,
        body: String,
    },
}

/// Post the signed event to the login endpoint.
///
/// The event is consumed: a signed event backs exactly one attempt.
///
/// # Errors
/// Returns an error if the request cannot be sent.
#[instrument(skip(client, event), fields(event_id = %event.id))]
pub async fn send(client: &Client, url: Url, event: SignedAuthEvent) -> Result<Response, reqwest::Error> {
    debug!("posting signed challenge");
    client.post(url).json(&event).send().await
}

/// Login endpoint for `base_url`.
///
/// # Errors
/// Returns an error if the joined URL is invalid.
pub fn login_url(base_url: &Url) -> Result<Url, url::ParseError> {
    base_url.join(LOGIN_PATH)
}

/// Collect status, target header, session cookie and body text.
///
/// The body is read on every status.
///
/// # Errors
/// Returns an error if the body cannot be read.
pub async fn read_reply(response: Response) -> Result<Reply, reqwest::Error> {
    let status = response.status();
    let headers = response.headers();

    let target = headers
        .get(RETARGET_HEADER)
        .and_then(|value| match value.to_str() {
            Ok(target) => Some(target.to_string()),
            Err(_) => {
                warn!("ignoring non-ASCII {} header", RETARGET_HEADER);
                None
            }
        })
        .filter(|target| !is_blank(target));

    let session = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session::cookie_value);

    let body = response.text().await?;

    Ok(Reply {
        status,
        target,
        session,
        body,
    })
}

fn is_blank(target: &str) -> bool {
    target.trim().is_empty()
}

/// Choose what the reply does to the page.
#[must_use]
pub fn decide(reply: Reply) -> Decision {
    match reply.target.filter(|target| !is_blank(target)) {
        Some(target) => Decision::Patch {
            status: reply.status,
            target,
            html: reply.body,
        },
        None if reply.status.is_success() => Decision::Navigate {
            path: DASHBOARD_PATH,
            session: reply.session,
        },
        None => Decision::Unhandled {
            status: reply.status,
            body: reply.body,
        },
    }
}
