#![allow(clippy::needless_for_each)]

use super::handlers::{
    auth, files, health, AccountResponse, ErrorResponse, SessionResponse, SignInRequest,
    SignUpRequest, VerifyOtpRequest,
};
use crate::{
    auth::UserRecord,
    files::{FileRecord, FileType, FilesPage},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::sign_up,
        auth::sign_in,
        auth::verify,
        auth::me,
        auth::sign_out,
        files::list_files,
    ),
    components(
        schemas(
            health::Health,
            SignUpRequest,
            SignInRequest,
            VerifyOtpRequest,
            AccountResponse,
            SessionResponse,
            ErrorResponse,
            UserRecord,
            FileType,
            FileRecord,
            FilesPage,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Email OTP sign up, sign in and sessions"),
        (name = "files", description = "Files by type for the signed-in user"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
