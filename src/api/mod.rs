//! HTTP surface: routing, middleware and server startup.

pub(crate) mod guard;
pub mod handlers;
mod openapi;
pub mod session;

pub use guard::CurrentUser;
pub use openapi::openapi;

use crate::{
    appwrite::Backend,
    auth::AuthService,
    files::DEFAULT_FILES_COLLECTION_ID,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

pub const DEFAULT_SIGN_IN_ROUTE: &str = "/sign-in";

/// HTTP-facing settings that are not part of the auth flow itself.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    sign_in_route: String,
    secure_cookies: bool,
    files_collection_id: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sign_in_route: DEFAULT_SIGN_IN_ROUTE.to_string(),
            secure_cookies: false,
            files_collection_id: DEFAULT_FILES_COLLECTION_ID.to_string(),
        }
    }

    /// Where anonymous visitors and signed-out users are sent.
    #[must_use]
    pub fn with_sign_in_route(mut self, route: String) -> Self {
        self.sign_in_route = route;
        self
    }

    /// Mark the session cookie `Secure`; on in production.
    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_files_collection_id(mut self, collection_id: String) -> Self {
        self.files_collection_id = collection_id;
        self
    }

    #[must_use]
    pub fn sign_in_route(&self) -> &str {
        &self.sign_in_route
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    #[must_use]
    pub fn files_collection_id(&self) -> &str {
        &self.files_collection_id
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, read-only state handed to every handler.
pub struct AppState<B> {
    pub auth: AuthService<B>,
    pub config: ApiConfig,
}

impl<B: Backend> AppState<B> {
    pub fn new(auth: AuthService<B>, config: ApiConfig) -> Self {
        Self { auth, config }
    }
}

/// Build the application router.
///
/// `/v1/files/*` sits behind [`guard::require_user`]; everything else is
/// reachable anonymously.
pub fn router<B: Backend + 'static>(state: Arc<AppState<B>>) -> Router {
    let files = Router::new()
        .route("/v1/files/:file_type", get(handlers::files::list_files::<B>))
        .route_layer(middleware::from_fn(guard::require_user::<B>));

    Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/v1/auth/sign-up", post(handlers::auth::sign_up::<B>))
        .route("/v1/auth/sign-in", post(handlers::auth::sign_in::<B>))
        .route("/v1/auth/verify", post(handlers::auth::verify::<B>))
        .route("/v1/auth/me", get(handlers::auth::me::<B>))
        .route("/v1/auth/sign-out", post(handlers::auth::sign_out::<B>))
        .merge(files)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new<B: Backend + 'static>(port: u16, state: Arc<AppState<B>>) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
