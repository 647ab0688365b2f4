//! # sigauth (Signed-Challenge Administrator Login)
//!
//! `sigauth` logs an administrator into a restricted dashboard by signing a
//! server-issued challenge with an externally held key instead of sending a
//! password.
//!
//! ## Flow
//!
//! 1. The nonce is read from the submitted login form (`passwordNonce`).
//! 2. An unsigned authentication event (`kind` 27235) is built around it.
//! 3. A signing port turns it into a signed event. This step may wait on a user
//!    approval for an unbounded time.
//! 4. The signed event is posted to `/admin/login` and the response is routed:
//!    the `HX-Retarget` header selects a fragment patch, otherwise a success
//!    navigates to `/admin`.
//!
//! The signer and the fragment patcher are injected as traits so hosts (a
//! browser shell, a terminal, tests) can supply their own implementations.

pub mod cli;
pub mod login;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
