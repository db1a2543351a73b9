//! Sign-up, sign-in, OTP verification, current user and sign-out endpoints.
//!
//! Domain outcomes come back as JSON with `accountId: null` and the
//! user-facing message; provider failures are already logged by the auth
//! service and surface here as 502.

use super::{
    error_response, AccountResponse, ErrorResponse, SessionResponse, SignInRequest,
    SignUpRequest, VerifyOtpRequest, PROVIDER_UNAVAILABLE,
};
use crate::{
    api::{
        session::{clear_session_cookie, extract_session_token, session_cookie},
        AppState,
    },
    appwrite::Backend,
    auth::{
        utils::{normalize_email, valid_email},
        AuthError, DomainError, UserRecord,
    },
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, instrument};

fn domain_status(err: DomainError) -> StatusCode {
    match err {
        DomainError::UserAlreadyExists => StatusCode::CONFLICT,
        DomainError::UserNotFound => StatusCode::NOT_FOUND,
    }
}

/// Map a failed sign-up/sign-in to its HTTP response.
fn account_error(err: &AuthError) -> Response {
    match err.domain() {
        Some(domain) => (
            domain_status(domain),
            Json(AccountResponse {
                account_id: None,
                error: Some(domain.to_string()),
            }),
        )
            .into_response(),
        None => error_response(StatusCode::BAD_GATEWAY, PROVIDER_UNAVAILABLE),
    }
}

/// Trimmed email, or the 400 response to return.
fn checked_email(email: &str) -> Result<String, Response> {
    let email = normalize_email(email);
    if valid_email(&email) {
        Ok(email)
    } else {
        Err(error_response(StatusCode::BAD_REQUEST, "Invalid email"))
    }
}

#[utoipa::path(
    post,
    path= "/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses (
        (status = 200, description = "Account created and OTP sent", body = AccountResponse),
        (status = 400, description = "Missing payload or invalid email", body = ErrorResponse),
        (status = 409, description = "User already exists", body = AccountResponse),
        (status = 502, description = "Identity provider failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(state, payload))]
pub async fn sign_up<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    payload: Option<Json<SignUpRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = match checked_email(&request.email) {
        Ok(email) => email,
        Err(response) => return response,
    };

    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing full name");
    }

    match state.auth.create_account(full_name, &email).await {
        Ok(account_id) => {
            debug!(%account_id, "sign up OTP requested");
            (
                StatusCode::OK,
                Json(AccountResponse {
                    account_id: Some(account_id),
                    error: None,
                }),
            )
                .into_response()
        }
        Err(err) => account_error(&err),
    }
}

#[utoipa::path(
    post,
    path= "/v1/auth/sign-in",
    request_body = SignInRequest,
    responses (
        (status = 200, description = "OTP sent to the account email", body = AccountResponse),
        (status = 400, description = "Missing payload or invalid email", body = ErrorResponse),
        (status = 404, description = "User not found", body = AccountResponse),
        (status = 502, description = "Identity provider failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(state, payload))]
pub async fn sign_in<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    payload: Option<Json<SignInRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = match checked_email(&request.email) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.auth.sign_in_user(&email).await {
        Ok(account_id) => (
            StatusCode::OK,
            Json(AccountResponse {
                account_id: Some(account_id),
                error: None,
            }),
        )
            .into_response(),
        Err(err) => account_error(&err),
    }
}

#[utoipa::path(
    post,
    path= "/v1/auth/verify",
    request_body = VerifyOtpRequest,
    responses (
        (status = 200, description = "Session created, cookie set", body = SessionResponse),
        (status = 400, description = "Missing payload", body = ErrorResponse),
        (status = 401, description = "Invalid or expired OTP", body = ErrorResponse),
        (status = 502, description = "Identity provider failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(state, payload))]
pub async fn verify<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if request.account_id.trim().is_empty() || request.password.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing account id or password");
    }

    let password = SecretString::from(request.password);

    let session = match state
        .auth
        .verify_one_time_password(request.account_id.trim(), &password)
        .await
    {
        Ok(session) => session,
        Err(AuthError::Infrastructure(err)) if err.is_unauthorized() => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid or expired one-time password",
            );
        }
        Err(_) => return error_response(StatusCode::BAD_GATEWAY, PROVIDER_UNAVAILABLE),
    };

    let cookie = match session_cookie(&session.secret, state.config.secure_cookies()) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session",
            );
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    (
        StatusCode::OK,
        headers,
        Json(SessionResponse {
            session_id: session.session_id,
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path= "/v1/auth/me",
    responses (
        (status = 200, description = "Signed-in user", body = UserRecord),
        (status = 204, description = "Nobody is signed in"),
    ),
    tag= "auth"
)]
#[instrument(skip(state, headers))]
pub async fn me<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    headers: HeaderMap,
) -> Response {
    let session = extract_session_token(&headers);

    match state.auth.current_user(session.as_ref()).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    post,
    path= "/v1/auth/sign-out",
    responses (
        (status = 303, description = "Session deleted and cookie cleared; redirect to sign in"),
    ),
    tag= "auth"
)]
#[instrument(skip(state, headers))]
pub async fn sign_out<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    headers: HeaderMap,
) -> Response {
    let session = extract_session_token(&headers);

    // The cookie is cleared either way; the provider error is already logged.
    if state.auth.sign_out_user(session.as_ref()).await.is_err() {
        debug!("provider session not deleted, clearing cookie anyway");
    }

    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(state.config.secure_cookies()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }

    (
        response_headers,
        Redirect::to(state.config.sign_in_route()),
    )
        .into_response()
}
