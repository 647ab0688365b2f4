//! Local secp256k1 key signer.
//!
//! Event ids are the SHA-256 of `[0, pubkey, created_at, kind, tags, content]`
//! serialized as compact JSON; signatures are BIP-340 Schnorr over the id.

use super::{
    event::{SignedAuthEvent, UnsignedAuthEvent},
    signer::{EventSigner, SignerError},
};
use anyhow::anyhow;
use async_trait::async_trait;
use secp256k1::{schnorr::Signature, All, Keypair, Message, Secp256k1, XOnlyPublicKey};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Signs with a secret key held in process memory.
pub struct LocalKeySigner {
    secp: Secp256k1<All>,
    keypair: Keypair,
    pubkey: String,
}

impl fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

impl LocalKeySigner {
    /// Load a signer from a hex-encoded 32-byte secret key.
    ///
    /// # Errors
    /// Returns `SignerError::Unavailable` if the key is not valid hex or not a
    /// valid secp256k1 secret key.
    pub fn from_hex(secret: &SecretString) -> Result<Self, SignerError> {
        let bytes = hex::decode(secret.expose_secret().trim())
            .map_err(|_| SignerError::Unavailable("secret key is not valid hex".to_string()))?;

        let secp = Secp256k1::new();
        let keypair = Keypair::from_seckey_slice(&secp, &bytes)
            .map_err(|_| SignerError::Unavailable("invalid secp256k1 secret key".to_string()))?;
        let pubkey = hex::encode(keypair.x_only_public_key().0.serialize());

        Ok(Self {
            secp,
            keypair,
            pubkey,
        })
    }

    /// Hex x-only public key.
    #[must_use]
    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }
}

#[async_trait]
impl EventSigner for LocalKeySigner {
    async fn sign_event(&self, event: &UnsignedAuthEvent) -> Result<SignedAuthEvent, SignerError> {
        let hash = event_hash(
            &self.pubkey,
            event.created_at(),
            event.kind(),
            event.tags(),
            event.content(),
        )?;

        let msg = Message::from_digest(hash);
        let sig = self.secp.sign_schnorr_no_aux_rand(&msg, &self.keypair);

        Ok(SignedAuthEvent::from_unsigned(
            event,
            hex::encode(hash),
            self.pubkey.clone(),
            hex::encode(sig.as_ref()),
        ))
    }
}

fn event_hash<T: Serialize>(
    pubkey: &str,
    created_at: u64,
    kind: u16,
    tags: &[T],
    content: &str,
) -> Result<[u8; 32], SignerError> {
    let arr = serde_json::json!([0, pubkey, created_at, kind, tags, content]);
    let data = serde_json::to_vec(&arr).map_err(|e| SignerError::Failed(e.to_string()))?;
    Ok(Sha256::digest(&data).into())
}

/// Check a signed event's id and Schnorr signature against its pubkey.
///
/// # Errors
/// Returns an error on an id mismatch, malformed hex, or a bad signature.
pub fn verify(event: &SignedAuthEvent) -> anyhow::Result<()> {
    let hash = event_hash(
        &event.pubkey,
        event.created_at,
        event.kind,
        &event.tags,
        &event.content,
    )?;
    if hex::encode(hash) != event.id {
        return Err(anyhow!("id mismatch"));
    }

    let sig = Signature::from_slice(&hex::decode(&event.sig)?)?;
    let pk = XOnlyPublicKey::from_slice(&hex::decode(&event.pubkey)?)?;
    Secp256k1::verification_only().verify_schnorr(&sig, &Message::from_digest(hash), &pk)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::event::build_at;

    fn secret(hex: &str) -> SecretString {
        SecretString::from(hex.to_string())
    }

    fn signer() -> LocalKeySigner {
        LocalKeySigner::from_hex(&secret(&"01".repeat(32))).unwrap()
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            LocalKeySigner::from_hex(&secret("not-hex")),
            Err(SignerError::Unavailable(_))
        ));
        assert!(matches!(
            LocalKeySigner::from_hex(&secret("abcd")),
            Err(SignerError::Unavailable(_))
        ));
        // zero is outside the curve order range
        assert!(matches!(
            LocalKeySigner::from_hex(&secret(&"00".repeat(32))),
            Err(SignerError::Unavailable(_))
        ));
    }

    #[test]
    fn pubkey_is_x_only_hex() {
        let signer = signer();
        assert_eq!(signer.pubkey().len(), 64);
        assert!(signer.pubkey().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", signer());
        assert!(rendered.contains("pubkey"));
        assert!(!rendered.contains("secp"));
        assert!(!rendered.contains(&"01".repeat(32)));
    }

    #[tokio::test]
    async fn signed_event_verifies() {
        let signer = signer();
        let signed = signer.sign_event(&build_at("abc123", 1_700_000_000)).await.unwrap();

        assert_eq!(signed.content, "abc123");
        assert_eq!(signed.pubkey, signer.pubkey());
        assert_eq!(signed.id.len(), 64);
        assert_eq!(signed.sig.len(), 128);
        assert!(verify(&signed).is_ok());
    }

    #[tokio::test]
    async fn tampered_event_fails_verification() {
        let signer = signer();
        let mut signed = signer.sign_event(&build_at("abc123", 1)).await.unwrap();
        signed.content = "abc124".to_string();
        let err = verify(&signed).unwrap_err();
        assert_eq!(err.to_string(), "id mismatch");
    }

    #[tokio::test]
    async fn forged_signature_fails_verification() {
        let signer = signer();
        let mut signed = signer.sign_event(&build_at("abc123", 1)).await.unwrap();
        let other = LocalKeySigner::from_hex(&secret(&"02".repeat(32))).unwrap();
        signed.sig = other.sign_event(&build_at("abc123", 1)).await.unwrap().sig;
        assert!(verify(&signed).is_err());

        signed.sig = "zz".to_string();
        assert!(verify(&signed).is_err());
    }

    #[tokio::test]
    async fn one_signer_signs_many_events() {
        let signer = signer();
        for n in 0..3_u64 {
            let signed = signer
                .sign_event(&build_at(&format!("nonce-{n}"), n))
                .await
                .unwrap();
            assert!(verify(&signed).is_ok());
        }
    }

    #[tokio::test]
    async fn signing_is_deterministic() {
        let signer = signer();
        let event = build_at("", 7);
        let first = signer.sign_event(&event).await.unwrap();
        let second = signer.sign_event(&event).await.unwrap();
        assert_eq!(first, second);
    }
}
