//! Session cookie encoding.
//!
//! The cookie carries the provider's session secret verbatim. It is never
//! persisted server-side; each request hands it back to the provider.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use secrecy::{ExposeSecret, SecretString};

/// Fixed by the provider's SDK conventions; the frontend reads the same name.
pub const SESSION_COOKIE_NAME: &str = "appwrite-session";

/// `Set-Cookie` value storing the session secret.
pub(crate) fn session_cookie(
    secret: &SecretString,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Strict",
        secret.expose_secret()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that removes the session cookie.
pub(crate) fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Session secret from the request cookies, if present and non-empty.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<SecretString> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
}
