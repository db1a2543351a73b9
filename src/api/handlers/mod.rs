pub mod auth;
pub mod files;
pub mod health;
pub use self::health::health;

pub mod types;
pub use self::types::{
    AccountResponse, ErrorResponse, FilesParams, SessionResponse, SignInRequest, SignUpRequest,
    VerifyOtpRequest,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub(crate) const PROVIDER_UNAVAILABLE: &str =
    "Identity provider unavailable, please try again later.";

/// JSON `{error}` body with the given status.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
