//! Signed-challenge login.
//!
//! Flow Overview: the nonce is read from the form ([`challenge`]), wrapped in
//! an unsigned event ([`event`]), signed through the injected port
//! ([`signer`]), posted and routed ([`router`]), and concluded by navigation
//! or a fragment patch ([`patch`]). [`flow`] strings the stages together.
//! Signatures and session cookies must never be logged.

pub mod challenge;
pub mod event;
pub mod flow;
pub mod keys;
pub mod patch;
pub mod router;
pub mod session;
pub mod signer;

pub use challenge::{extract_nonce, fetch_challenge, http_client, FormFields, LoginParams};
pub use event::{build, SignedAuthEvent, UnsignedAuthEvent, AUTH_EVENT_KIND};
pub use flow::{FlowError, LoginFlow, Outcome};
pub use keys::LocalKeySigner;
pub use patch::{PatchPort, SwapStyle, WriterPatcher};
pub use signer::{EventSigner, SignerError};
