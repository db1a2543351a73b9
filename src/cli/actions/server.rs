use crate::{
    api::{self, ApiConfig, AppState},
    appwrite::AppwriteClient,
    auth::{AuthConfig, AuthService},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub appwrite_endpoint: String,
    pub appwrite_project_id: String,
    pub appwrite_api_key: SecretString,
    pub database_id: String,
    pub users_collection_id: String,
    pub files_collection_id: String,
    pub avatar_placeholder_url: String,
    pub sign_in_route: String,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the Appwrite client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let client = AppwriteClient::new(
        &args.appwrite_endpoint,
        args.appwrite_project_id,
        args.appwrite_api_key,
        args.database_id,
    )
    .context("Failed to build Appwrite client")?;

    let auth = AuthService::new(
        client,
        AuthConfig::new(args.users_collection_id)
            .with_avatar_placeholder_url(args.avatar_placeholder_url),
    );

    let config = ApiConfig::new()
        .with_sign_in_route(args.sign_in_route)
        .with_secure_cookies(args.secure_cookies)
        .with_files_collection_id(args.files_collection_id);

    api::new(args.port, Arc::new(AppState::new(auth, config))).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("appwrite_endpoint", args.appwrite_endpoint.clone()),
        ("appwrite_project_id", args.appwrite_project_id.clone()),
        ("database_id", args.database_id.clone()),
        ("users_collection_id", args.users_collection_id.clone()),
        ("files_collection_id", args.files_collection_id.clone()),
        ("sign_in_route", args.sign_in_route.clone()),
        ("secure_cookies", args.secure_cookies.to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
