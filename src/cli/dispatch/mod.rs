use crate::cli::{
    actions::{server::Args, Action},
    commands::{
        appwrite::{
            ARG_APPWRITE_API_KEY, ARG_APPWRITE_ENDPOINT, ARG_APPWRITE_PROJECT_ID,
            ARG_AVATAR_PLACEHOLDER_URL, ARG_DATABASE_ID, ARG_FILES_COLLECTION_ID,
            ARG_USERS_COLLECTION_ID,
        },
        ARG_ENVIRONMENT, ARG_PORT, ARG_SIGN_IN_ROUTE,
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let production = matches
        .get_one::<String>(ARG_ENVIRONMENT)
        .is_some_and(|environment| environment == "production");

    Ok(Action::Server(Args {
        port,
        appwrite_endpoint: required(matches, ARG_APPWRITE_ENDPOINT)?,
        appwrite_project_id: required(matches, ARG_APPWRITE_PROJECT_ID)?,
        appwrite_api_key: SecretString::from(required(matches, ARG_APPWRITE_API_KEY)?),
        database_id: required(matches, ARG_DATABASE_ID)?,
        users_collection_id: required(matches, ARG_USERS_COLLECTION_ID)?,
        files_collection_id: required(matches, ARG_FILES_COLLECTION_ID)?,
        avatar_placeholder_url: required(matches, ARG_AVATAR_PLACEHOLDER_URL)?,
        sign_in_route: required(matches, ARG_SIGN_IN_ROUTE)?,
        secure_cookies: production,
    }))
}
