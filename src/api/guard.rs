//! Route guard for pages that need a signed-in user.

use super::{session::extract_session_token, AppState};
use crate::{appwrite::Backend, auth::UserRecord};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

/// The signed-in user, inserted into request extensions by [`require_user`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserRecord);

/// Resolve the session cookie to a user or redirect (303) to the sign-in route.
pub(crate) async fn require_user<B: Backend + 'static>(
    Extension(state): Extension<Arc<AppState<B>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = extract_session_token(request.headers());

    match state.auth.current_user(session.as_ref()).await {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        None => {
            debug!(
                path = request.uri().path(),
                "no signed-in user, redirecting to sign in"
            );
            Redirect::to(state.config.sign_in_route()).into_response()
        }
    }
}
