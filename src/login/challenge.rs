//! Challenge extraction and retrieval.
//!
//! The login form carries the server nonce in the `passwordNonce` field. The
//! extractor never trims, validates or rejects it: a missing field becomes an
//! empty nonce and the server decides.

use crate::APP_USER_AGENT;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Well-known form field holding the server nonce.
pub const NONCE_FIELD: &str = "passwordNonce";

/// Path serving the login page and issuing nonces.
pub const LOGIN_PATH: &str = "/admin/login";

/// Submitted form fields keyed by field name.
pub type FormFields = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),
    #[error("challenge request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("challenge request returned {status}: {body}")]
    Http { status: u16, body: String },
}

/// Login page parameters returned when the page is requested as JSON.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoginParams {
    #[serde(rename = "Nonce")]
    pub nonce: String,
    #[serde(rename = "ADMINNPUB", default)]
    pub admin_npub: String,
}

impl LoginParams {
    /// Present the parameters the way the login form submits them.
    #[must_use]
    pub fn into_form(self) -> FormFields {
        HashMap::from([(NONCE_FIELD.to_string(), self.nonce)])
    }
}

/// Read the nonce from submitted form fields.
#[must_use]
pub fn extract_nonce(fields: &FormFields) -> String {
    fields.get(NONCE_FIELD).cloned().unwrap_or_default()
}

/// Request a fresh nonce from the login page.
///
/// # Errors
/// Returns an error if the URL cannot be built, the request fails, or the
/// server answers with a non-2xx status.
#[instrument(skip(client))]
pub async fn fetch_challenge(client: &Client, base_url: &Url) -> Result<LoginParams, ChallengeError> {
    let url = base_url.join(LOGIN_PATH)?;

    let response = client
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChallengeError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let params: LoginParams = response.json().await?;

    debug!(admin_npub = %params.admin_npub, "received login challenge");

    Ok(params)
}

/// Build the HTTP client used for every request of a login session.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(APP_USER_AGENT).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn extract_returns_field_verbatim() {
        let fields = HashMap::from([
            (NONCE_FIELD.to_string(), "  abc123 ".to_string()),
            ("other".to_string(), "ignored".to_string()),
        ]);
        assert_eq!(extract_nonce(&fields), "  abc123 ");
    }

    #[test]
    fn extract_missing_field_is_empty() {
        let fields = HashMap::from([("passwordnonce".to_string(), "wrong-case".to_string())]);
        assert_eq!(extract_nonce(&fields), "");
        assert_eq!(extract_nonce(&FormFields::new()), "");
    }

    #[test]
    fn login_params_into_form() {
        let params = LoginParams {
            nonce: "abc123".to_string(),
            admin_npub: "npub1xyz".to_string(),
        };
        assert_eq!(extract_nonce(&params.into_form()), "abc123");
    }

    #[tokio::test]
    async fn fetch_challenge_reads_json_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/login"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Nonce": "abc123",
                "ADMINNPUB": "npub1xyz"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = http_client().unwrap();
        let base = Url::parse(&server.uri()).unwrap();
        let params = fetch_challenge(&client, &base).await.unwrap();
        assert_eq!(params.nonce, "abc123");
        assert_eq!(params.admin_npub, "npub1xyz");
    }

    #[tokio::test]
    async fn fetch_challenge_surfaces_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/login"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("there was a problem generating a nonce"),
            )
            .mount(&server)
            .await;

        let client = http_client().unwrap();
        let base = Url::parse(&server.uri()).unwrap();
        let err = fetch_challenge(&client, &base).await.unwrap_err();
        match err {
            ChallengeError::Http { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("nonce"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
