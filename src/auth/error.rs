//! Auth outcome errors.

use crate::appwrite::ProviderError;
use thiserror::Error;

/// Expected outcomes the UI shows to the user; never logged as failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("User already exists. Please sign in.")]
    UserAlreadyExists,

    #[error("User not found. Please sign up first.")]
    UserNotFound,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infrastructure(#[from] ProviderError),

    /// Account creation succeeded but no account id came back.
    #[error("Failed to send an OTP")]
    OtpNotIssued,

    /// The OTP was accepted but the session came back without a secret.
    #[error("Failed to create a session")]
    SessionNotIssued,
}

impl AuthError {
    #[must_use]
    pub fn domain(&self) -> Option<DomainError> {
        match self {
            Self::Domain(kind) => Some(*kind),
            Self::Infrastructure(_) | Self::OtpNotIssued | Self::SessionNotIssued => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_messages_are_user_facing() {
        assert_eq!(
            DomainError::UserAlreadyExists.to_string(),
            "User already exists. Please sign in."
        );
        assert_eq!(
            DomainError::UserNotFound.to_string(),
            "User not found. Please sign up first."
        );
    }

    #[test]
    fn domain_is_only_set_for_domain_errors() {
        let err = AuthError::from(DomainError::UserNotFound);
        assert_eq!(err.domain(), Some(DomainError::UserNotFound));
        assert_eq!(err.to_string(), "User not found. Please sign up first.");

        let err = AuthError::from(ProviderError::Endpoint("x".to_string()));
        assert_eq!(err.domain(), None);
        assert_eq!(AuthError::OtpNotIssued.domain(), None);
        assert_eq!(AuthError::SessionNotIssued.domain(), None);
    }
}
