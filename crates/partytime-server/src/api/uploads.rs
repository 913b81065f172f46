use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use super::extract::ApiPath;
use super::AppState;
use crate::error::ServerError;
use crate::media::content_type_for;

/// Serve a stored image. Only bare file names under the upload root resolve.
pub async fn serve_file(
    State(state): State<AppState>,
    ApiPath(file): ApiPath<String>,
) -> Result<impl IntoResponse, ServerError> {
    let data = state.media.read(&file).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&file)),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}
