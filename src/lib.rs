//! # Filedesk
//!
//! `filedesk` is the server side of a file-storage application. Users sign in
//! with an email one-time password (OTP) and then browse their files grouped
//! by type. All durable state (accounts, sessions, user and file documents)
//! lives in an Appwrite project; this crate forwards to it and maps results
//! into JSON responses.
//!
//! ## Sessions
//!
//! A verified OTP is exchanged for an Appwrite session whose secret is stored
//! in the `appwrite-session` cookie (`HttpOnly`, `SameSite=Strict`, `Secure` in
//! production). Handlers read the cookie per request and pass the secret
//! explicitly to the backend; nothing session-related is kept in process.
//!
//! ## Errors
//!
//! Domain outcomes (user already exists, user not found) are returned as
//! [`auth::DomainError`] values. Provider failures are logged and surfaced as
//! [`appwrite::ProviderError`], except when resolving the current user where
//! they collapse into "nobody is signed in".

pub mod api;
pub mod appwrite;
pub mod auth;
pub mod cli;
pub mod files;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
