//! Email OTP authentication and provider-backed sessions.
//!
//! Every operation is a single pass over the provider: look up the user
//! record, create the identity account or email token, exchange the OTP for a
//! session, or resolve/delete a session. There is no local state; the session
//! secret is handed in by the caller on every request.
//!
//! ## Outcomes
//!
//! - Domain results (`UserAlreadyExists`, `UserNotFound`) come back as
//!   [`AuthError::Domain`] and are shown to the user as-is.
//! - Provider failures are logged where they happen and come back as
//!   [`AuthError::Infrastructure`]. [`AuthService::current_user`] is the one
//!   exception: it logs and answers `None`, since it only probes whether
//!   anyone is signed in.

mod error;
mod models;
mod service;
pub(crate) mod utils;

pub use error::{AuthError, DomainError};
pub use models::{
    AuthConfig, UserRecord, DEFAULT_AVATAR_PLACEHOLDER_URL, DEFAULT_USERS_COLLECTION_ID,
};
pub use service::{AuthService, VerifiedSession};
