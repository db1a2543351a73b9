//! Identity/database provider contract and its Appwrite implementation.
//!
//! [`Backend`] is the seam the auth and file layers are written against. It
//! names exactly the provider calls the service needs: document query and
//! create, account create, email token create, and session create/get/delete.
//! [`AppwriteClient`] implements it over the Appwrite REST API.

mod client;
#[cfg(test)]
pub(crate) mod memory;
pub mod models;
pub mod query;

pub use client::AppwriteClient;
pub use models::{Account, DocumentList, Session, Token};
pub use query::{Query, QueryValue};

use secrecy::SecretString;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use ulid::Ulid;

/// Placeholder session id that targets the session used to make the request.
pub const CURRENT_SESSION: &str = "current";

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider answered with a non-success status.
    #[error("{url} - {status}, {message}")]
    Api {
        url: String,
        status: u16,
        kind: String,
        message: String,
    },

    #[error("request to identity provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from identity provider: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid provider endpoint: {0}")]
    Endpoint(String),
}

impl ProviderError {
    /// HTTP status returned by the provider, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::Endpoint(_) => None,
        }
    }

    /// The provider rejected the credentials (bad OTP, expired or unknown session).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Which credentials a request is made with.
#[derive(Clone, Copy, Debug)]
pub enum Scope<'a> {
    /// Project API key.
    Admin,
    /// A user session secret taken from the request cookie.
    Session(&'a SecretString),
}

/// Provider calls used by the service.
///
/// Every method is a single request/response exchange; implementations do
/// not retry.
pub trait Backend: Send + Sync {
    fn list_documents(
        &self,
        scope: Scope<'_>,
        collection_id: &str,
        queries: &[Query],
    ) -> impl Future<Output = ProviderResult<DocumentList>> + Send;

    fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> impl Future<Output = ProviderResult<Value>> + Send;

    fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = ProviderResult<Account>> + Send;

    fn create_email_token(
        &self,
        user_id: &str,
        email: &str,
    ) -> impl Future<Output = ProviderResult<Token>> + Send;

    fn create_session(
        &self,
        user_id: &str,
        secret: &SecretString,
    ) -> impl Future<Output = ProviderResult<Session>> + Send;

    fn get_account(
        &self,
        session: &SecretString,
    ) -> impl Future<Output = ProviderResult<Account>> + Send;

    fn delete_session(
        &self,
        session: &SecretString,
        session_id: &str,
    ) -> impl Future<Output = ProviderResult<()>> + Send;
}

/// New provider id: 26 lowercase alphanumerics, within Appwrite's id charset and length.
#[must_use]
pub fn unique_id() -> String {
    Ulid::new().to_string().to_lowercase()
}
