use super::{error_response, ErrorResponse, FilesParams, PROVIDER_UNAVAILABLE};
use crate::{
    api::{AppState, CurrentUser},
    appwrite::Backend,
    files::{self, FileListRequest, FilesPage},
};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, instrument};

#[utoipa::path(
    get,
    path= "/v1/files/{file_type}",
    params(
        ("file_type" = String, Path, description = "documents, images, media or others"),
        FilesParams
    ),
    responses (
        (status = 200, description = "Files owned by or shared with the user", body = FilesPage),
        (status = 303, description = "Not signed in; redirect to sign in"),
        (status = 502, description = "Identity provider failure", body = ErrorResponse),
    ),
    tag= "files"
)]
#[instrument(skip(state, user, params), fields(user_id = %user.0.id))]
pub async fn list_files<B: Backend + 'static>(
    state: Extension<Arc<AppState<B>>>,
    Extension(user): Extension<CurrentUser>,
    Path(file_type): Path<String>,
    Query(params): Query<FilesParams>,
) -> Response {
    let mut request = FileListRequest::from_route(
        &file_type,
        params.query.as_deref(),
        params.sort.as_deref(),
    );
    if let Some(limit) = params.limit {
        request = request.with_limit(limit);
    }

    match files::list_files(
        state.auth.backend(),
        state.config.files_collection_id(),
        &file_type,
        &user.0,
        &request,
    )
    .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => {
            error!("Failed to list files: {err}");
            error_response(StatusCode::BAD_GATEWAY, PROVIDER_UNAVAILABLE)
        }
    }
}
