//! Signing port.
//!
//! The signing capability lives outside this crate: a browser extension, a
//! hardware device, or the local key signer in [`super::keys`]. Signing may
//! wait on a user confirmation, so callers must not assume it completes
//! promptly and nothing here applies a timeout.

use super::event::{SignedAuthEvent, UnsignedAuthEvent};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    /// No signing capability is present.
    #[error("signing capability unavailable: {0}")]
    Unavailable(String),
    /// The user refused to sign.
    #[error("signing declined by user")]
    Declined,
    #[error("signer failed: {0}")]
    Failed(String),
}

/// Anything exposing an asynchronous `sign_event`.
#[async_trait]
pub trait EventSigner: Send + Sync {
    /// Sign `event`, returning the signed copy.
    async fn sign_event(&self, event: &UnsignedAuthEvent) -> Result<SignedAuthEvent, SignerError>;
}

/// A missing capability rejects every request.
#[async_trait]
impl<S: EventSigner> EventSigner for Option<S> {
    async fn sign_event(&self, event: &UnsignedAuthEvent) -> Result<SignedAuthEvent, SignerError> {
        match self {
            Some(signer) => signer.sign_event(event).await,
            None => Err(SignerError::Unavailable(
                "no signer configured".to_string(),
            )),
        }
    }
}

#[async_trait]
impl<S: EventSigner + ?Sized> EventSigner for Arc<S> {
    async fn sign_event(&self, event: &UnsignedAuthEvent) -> Result<SignedAuthEvent, SignerError> {
        (**self).sign_event(event).await
    }
}

/// Obtain a signature for `event`, logging any rejection.
///
/// # Errors
/// Returns the signer's rejection unchanged.
pub async fn sign<S: EventSigner + ?Sized>(
    signer: &S,
    event: &UnsignedAuthEvent,
) -> Result<SignedAuthEvent, SignerError> {
    match signer.sign_event(event).await {
        Ok(signed) => {
            debug!(event_id = %signed.id, "challenge signed");
            Ok(signed)
        }
        Err(err) => {
            warn!(error = %err, "signing rejected, aborting login");
            Err(err)
        }
    }
}
