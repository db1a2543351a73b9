//! Sign-up, sign-in, OTP verification and session resolution.
//!
//! Flow Overview:
//! 1) `create_account` / `sign_in_user` look the email up in the users
//!    collection and, when allowed, ask the provider to email an OTP.
//! 2) The client submits the OTP with the returned account id to
//!    `verify_one_time_password`, which exchanges it for a session.
//! 3) `current_user` resolves a session secret back to a user record.
//! 4) `sign_out_user` deletes the provider session.
//!
//! The OTP-requested state exists only at the provider.

use super::{
    error::{AuthError, DomainError},
    models::{AuthConfig, NewUser, UserRecord},
    utils::generate_password,
};
use crate::appwrite::{unique_id, Backend, ProviderError, Query, Scope, CURRENT_SESSION};
use secrecy::SecretString;
use std::fmt;
use tracing::{debug, error, instrument};

/// Session returned by a successful OTP verification.
pub struct VerifiedSession {
    pub session_id: String,
    pub secret: SecretString,
}

impl fmt::Debug for VerifiedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedSession")
            .field("session_id", &self.session_id)
            .field("secret", &"***")
            .finish()
    }
}

/// Log a provider failure and wrap it; callers still get the error.
fn handle_error(message: &'static str) -> impl FnOnce(ProviderError) -> AuthError {
    move |err| {
        error!("{message}: {err}");
        AuthError::Infrastructure(err)
    }
}

pub struct AuthService<B> {
    backend: B,
    config: AuthConfig,
}

impl<B: Backend> AuthService<B> {
    pub fn new(backend: B, config: AuthConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Exact-match lookup on the users collection.
    ///
    /// # Errors
    /// Returns the provider error if the query fails.
    #[instrument(skip(self))]
    pub async fn lookup_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, ProviderError> {
        self.backend
            .list_documents(
                Scope::Admin,
                self.config.users_collection_id(),
                &[Query::equal("email", [email])],
            )
            .await?
            .first()
    }

    /// Create a new identity account with a throwaway password and email it an OTP.
    ///
    /// # Errors
    /// Provider failures are logged and returned.
    #[instrument(skip(self))]
    pub async fn request_sign_up_otp(&self, email: &str) -> Result<String, AuthError> {
        let password = generate_password();

        let account = self
            .backend
            .create_account(&unique_id(), email, &password)
            .await
            .map_err(handle_error("Failed to send email OTP for sign up"))?;

        self.backend
            .create_email_token(&unique_id(), email)
            .await
            .map_err(handle_error("Failed to send email OTP for sign up"))?;

        debug!(account_id = %account.id, "sign up OTP sent");

        Ok(account.id)
    }

    /// Email an OTP to an existing account without creating one.
    ///
    /// # Errors
    /// Provider failures are logged and returned.
    #[instrument(skip(self))]
    pub async fn request_sign_in_otp(&self, email: &str) -> Result<bool, AuthError> {
        self.backend
            .create_email_token(&unique_id(), email)
            .await
            .map_err(handle_error("Failed to send email OTP for sign in"))?;

        Ok(true)
    }

    /// Sign up: reject known emails, otherwise create the account, send the
    /// OTP and store the user record. Returns the new account id.
    ///
    /// # Errors
    /// `DomainError::UserAlreadyExists` if the email has a user record (nothing
    /// is written), `AuthError::OtpNotIssued` if the provider returned no
    /// account id, or the provider error.
    #[instrument(skip(self))]
    pub async fn create_account(&self, full_name: &str, email: &str) -> Result<String, AuthError> {
        let existing = self
            .lookup_user_by_email(email)
            .await
            .map_err(handle_error("Failed to look up user"))?;

        if existing.is_some() {
            return Err(DomainError::UserAlreadyExists.into());
        }

        let account_id = self.request_sign_up_otp(email).await?;
        if account_id.is_empty() {
            error!("Failed to send an OTP: provider returned no account id");
            return Err(AuthError::OtpNotIssued);
        }

        let user = NewUser {
            full_name,
            email,
            avatar: self.config.avatar_placeholder_url(),
            account_id: &account_id,
        };
        let data = serde_json::to_value(&user)
            .map_err(|err| handle_error("Failed to create user record")(err.into()))?;

        self.backend
            .create_document(self.config.users_collection_id(), &unique_id(), data)
            .await
            .map_err(handle_error("Failed to create user record"))?;

        Ok(account_id)
    }

    /// Sign in: send an OTP to a known user and return their account id.
    ///
    /// # Errors
    /// `DomainError::UserNotFound` if there is no user record (no OTP is
    /// sent), or the provider error.
    #[instrument(skip(self))]
    pub async fn sign_in_user(&self, email: &str) -> Result<String, AuthError> {
        let existing = self
            .lookup_user_by_email(email)
            .await
            .map_err(handle_error("Failed to sign in user"))?;

        let Some(user) = existing else {
            return Err(DomainError::UserNotFound.into());
        };

        self.request_sign_in_otp(email).await?;

        Ok(user.account_id)
    }

    /// Exchange an OTP for a provider session.
    ///
    /// # Errors
    /// Provider failures (including a rejected OTP) are logged and returned.
    /// `AuthError::SessionNotIssued` if the session has no secret.
    #[instrument(skip(self, password))]
    pub async fn verify_one_time_password(
        &self,
        account_id: &str,
        password: &SecretString,
    ) -> Result<VerifiedSession, AuthError> {
        let session = self
            .backend
            .create_session(account_id, password)
            .await
            .map_err(handle_error("Failed to verify OTP"))?;

        if session.secret.is_empty() {
            error!(session_id = %session.id, "Failed to verify OTP: provider returned no session secret");
            return Err(AuthError::SessionNotIssued);
        }

        Ok(VerifiedSession {
            session_id: session.id,
            secret: SecretString::from(session.secret),
        })
    }

    /// Resolve a session secret to its user record.
    ///
    /// Returns `None` for a missing or invalid session, a session without a
    /// user record, or any provider failure (logged).
    #[instrument(skip(self, session))]
    pub async fn current_user(&self, session: Option<&SecretString>) -> Option<UserRecord> {
        let session = session?;

        let result: Result<Option<UserRecord>, ProviderError> = async {
            let account = self.backend.get_account(session).await?;

            self.backend
                .list_documents(
                    Scope::Session(session),
                    self.config.users_collection_id(),
                    &[Query::equal("accountId", [account.id.as_str()])],
                )
                .await?
                .first()
        }
        .await;

        match result {
            Ok(user) => user,
            Err(err) => {
                error!("Failed to resolve current user: {err}");
                None
            }
        }
    }

    /// Delete the provider session behind `session`, if any.
    ///
    /// # Errors
    /// Provider failures are logged and returned; callers still clear the
    /// cookie and redirect.
    #[instrument(skip(self, session))]
    pub async fn sign_out_user(&self, session: Option<&SecretString>) -> Result<(), AuthError> {
        let Some(session) = session else {
            return Ok(());
        };

        self.backend
            .delete_session(session, CURRENT_SESSION)
            .await
            .map_err(handle_error("Failed to sign out user"))
    }
}
