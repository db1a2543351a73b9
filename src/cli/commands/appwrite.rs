use crate::{
    auth::{DEFAULT_AVATAR_PLACEHOLDER_URL, DEFAULT_USERS_COLLECTION_ID},
    files::DEFAULT_FILES_COLLECTION_ID,
};
use clap::{Arg, Command};

pub const ARG_APPWRITE_ENDPOINT: &str = "appwrite-endpoint";
pub const ARG_APPWRITE_PROJECT_ID: &str = "appwrite-project-id";
pub const ARG_APPWRITE_API_KEY: &str = "appwrite-api-key";
pub const ARG_DATABASE_ID: &str = "database-id";
pub const ARG_USERS_COLLECTION_ID: &str = "users-collection-id";
pub const ARG_FILES_COLLECTION_ID: &str = "files-collection-id";
pub const ARG_AVATAR_PLACEHOLDER_URL: &str = "avatar-placeholder-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_APPWRITE_ENDPOINT)
                .long(ARG_APPWRITE_ENDPOINT)
                .help("Appwrite API endpoint, example: https://cloud.appwrite.io/v1")
                .env("FILEDESK_APPWRITE_ENDPOINT")
                .required(true),
        )
        .arg(
            Arg::new(ARG_APPWRITE_PROJECT_ID)
                .long(ARG_APPWRITE_PROJECT_ID)
                .help("Appwrite project id")
                .env("FILEDESK_APPWRITE_PROJECT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_APPWRITE_API_KEY)
                .long(ARG_APPWRITE_API_KEY)
                .help("Appwrite API key with database and user scopes")
                .env("FILEDESK_APPWRITE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DATABASE_ID)
                .long(ARG_DATABASE_ID)
                .help("Database holding the users and files collections")
                .env("FILEDESK_DATABASE_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_USERS_COLLECTION_ID)
                .long(ARG_USERS_COLLECTION_ID)
                .help("Users collection id")
                .env("FILEDESK_USERS_COLLECTION_ID")
                .default_value(DEFAULT_USERS_COLLECTION_ID),
        )
        .arg(
            Arg::new(ARG_FILES_COLLECTION_ID)
                .long(ARG_FILES_COLLECTION_ID)
                .help("Files collection id")
                .env("FILEDESK_FILES_COLLECTION_ID")
                .default_value(DEFAULT_FILES_COLLECTION_ID),
        )
        .arg(
            Arg::new(ARG_AVATAR_PLACEHOLDER_URL)
                .long(ARG_AVATAR_PLACEHOLDER_URL)
                .help("Avatar stored on new user records")
                .env("FILEDESK_AVATAR_PLACEHOLDER_URL")
                .default_value(DEFAULT_AVATAR_PLACEHOLDER_URL),
        )
}
