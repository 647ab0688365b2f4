//! Authentication event model.
//!
//! ```json
//! {
//!   "id": "e1",
//!   "pubkey": "79be667e...",
//!   "created_at": 1700000000,
//!   "kind": 27235,
//!   "tags": [],
//!   "content": "abc123",
//!   "sig": "s1"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Event kind for "authentication request" semantics. Not configurable.
pub const AUTH_EVENT_KIND: u16 = 27235;

/// A single tag array, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag(pub Vec<String>);

/// Challenge payload handed to the signing port. Never transmitted.
///
/// Fields are private so the event cannot change after [`build`] returns.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnsignedAuthEvent {
    created_at: u64,
    kind: u16,
    tags: Vec<Tag>,
    content: String,
}

impl UnsignedAuthEvent {
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    #[must_use]
    pub const fn kind(&self) -> u16 {
        self.kind
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The nonce, verbatim.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Event returned by the signing port and posted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedAuthEvent {
    /// Content-derived identifier; opaque here.
    pub id: String,
    /// Signer public key (hex).
    #[serde(default)]
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
    /// Signature over the event; opaque here.
    pub sig: String,
}

impl SignedAuthEvent {
    /// Attach signer output to the unsigned payload it was produced from.
    #[must_use]
    pub fn from_unsigned(
        event: &UnsignedAuthEvent,
        id: String,
        pubkey: String,
        sig: String,
    ) -> Self {
        Self {
            id,
            pubkey,
            created_at: event.created_at,
            kind: event.kind,
            tags: event.tags.clone(),
            content: event.content.clone(),
            sig,
        }
    }
}

/// Build the unsigned event for `nonce`, stamped with the current time.
#[must_use]
pub fn build(nonce: &str) -> UnsignedAuthEvent {
    build_at(nonce, unix_now())
}

/// Build the unsigned event for `nonce` with an explicit timestamp.
#[must_use]
pub fn build_at(nonce: &str, created_at: u64) -> UnsignedAuthEvent {
    UnsignedAuthEvent {
        created_at,
        kind: AUTH_EVENT_KIND,
        tags: Vec::new(),
        content: nonce.to_string(),
    }
}

fn unix_now() -> u64 {
    // a clock before the epoch is reported as 0 rather than failing the login
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
