//! Login flow: unsigned event -> signed event -> routing decision.
//!
//! Every call to [`LoginFlow::submit`] is an independent attempt. Concurrent
//! submissions are neither deduplicated nor ordered; hosts that need a single
//! outstanding attempt should disable their submit control while one runs.

use super::{
    challenge::{extract_nonce, FormFields},
    event,
    patch::{self, normalize_target, PatchPort},
    router::{self, Decision},
    signer::{self, EventSigner, SignerError},
};
use reqwest::Client;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{error, info, instrument, warn, Span};
use ulid::Ulid;
use url::Url;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Signing(#[from] SignerError),
    #[error("invalid login url: {0}")]
    Url(#[from] url::ParseError),
    #[error("login request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx without a target header; nothing was rendered.
    #[error("login rejected with status {status}")]
    Rejected { status: u16, body: String },
}

/// How a completed attempt concluded.
#[derive(Debug)]
pub enum Outcome {
    /// Full navigation to the dashboard.
    Navigated {
        location: Url,
        session: Option<SecretString>,
    },
    /// A fragment was patched into `selector`; `status` tells success from
    /// an in-place error.
    Patched { status: u16, selector: String },
}

pub struct LoginFlow<S, P> {
    client: Client,
    base_url: Url,
    signer: S,
    patcher: P,
}

impl<S, P> LoginFlow<S, P>
where
    S: EventSigner,
    P: PatchPort,
{
    pub fn new(client: Client, base_url: Url, signer: S, patcher: P) -> Self {
        Self {
            client,
            base_url,
            signer,
            patcher,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run one login attempt for the submitted form.
    ///
    /// # Errors
    /// Returns an error if signing is rejected, the request fails, or the
    /// server rejects the login without naming a target to render into.
    #[instrument(skip_all, fields(flow_id = %Ulid::new(), status = tracing::field::Empty))]
    pub async fn submit(&self, fields: &FormFields) -> Result<Outcome, FlowError> {
        let unsigned = event::build(&extract_nonce(fields));

        let signed = signer::sign(&self.signer, &unsigned).await?;

        let url = router::login_url(&self.base_url)?;
        let response = router::send(&self.client, url, signed)
            .await
            .inspect_err(|e| error!("Error posting login: {:?}", e))?;
        let reply = router::read_reply(response)
            .await
            .inspect_err(|e| error!("Error reading login response: {:?}", e))?;

        Span::current().record("status", reply.status.as_u16());

        match router::decide(reply) {
            Decision::Navigate { path, session } => {
                let location = self.base_url.join(path)?;
                info!(%location, "login accepted");
                Ok(Outcome::Navigated { location, session })
            }
            Decision::Patch {
                status,
                target,
                html,
            } => {
                patch::apply(&self.patcher, &target, &html);
                Ok(Outcome::Patched {
                    status: status.as_u16(),
                    selector: normalize_target(&target),
                })
            }
            Decision::Unhandled { status, body } => {
                warn!("login rejected without a target to render into");
                Err(FlowError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
