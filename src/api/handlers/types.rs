//! Request/response types for the HTTP endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignInRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub account_id: String,
    /// The one-time password received by email.
    pub password: String,
}

impl fmt::Debug for VerifyOtpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOtpRequest")
            .field("account_id", &self.account_id)
            .field("password", &"***")
            .finish()
    }
}

/// Sign-up/sign-in result. `accountId` is null when `error` explains why.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct FilesParams {
    /// Case-sensitive substring of the file name.
    pub query: Option<String>,
    /// `attribute-asc` or `attribute-desc`, default `$createdAt-desc`.
    pub sort: Option<String>,
    pub limit: Option<u32>,
}
