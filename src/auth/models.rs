//! User documents and auth configuration.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_USERS_COLLECTION_ID: &str = "users";
pub const DEFAULT_AVATAR_PLACEHOLDER_URL: &str =
    "https://img.freepik.com/free-psd/3d-illustration-person-with-sunglasses_23-2149436188.jpg";

/// A document in the users collection.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "$id")]
    pub id: String,
    pub account_id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar: String,
}

/// Payload written when a user signs up.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub avatar: &'a str,
    pub account_id: &'a str,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    users_collection_id: String,
    avatar_placeholder_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(users_collection_id: String) -> Self {
        Self {
            users_collection_id,
            avatar_placeholder_url: DEFAULT_AVATAR_PLACEHOLDER_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_avatar_placeholder_url(mut self, url: String) -> Self {
        self.avatar_placeholder_url = url;
        self
    }

    #[must_use]
    pub fn users_collection_id(&self) -> &str {
        &self.users_collection_id
    }

    #[must_use]
    pub fn avatar_placeholder_url(&self) -> &str {
        &self.avatar_placeholder_url
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USERS_COLLECTION_ID.to_string())
    }
}
