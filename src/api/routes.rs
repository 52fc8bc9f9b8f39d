//! API routes: trigger a download, fetch a downloaded file.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::error;

use crate::api::error::{ApiError, ApiResult};
use crate::api::server::AppState;
use crate::core::DownloadRequest;
use crate::utils::content_type_for;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/download", post(download))
        .route("/api/file/{filename}", get(get_file))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct DownloadResponse {
    /// Relative URL the file can be fetched from.
    file: String,
    title: String,
    platform: String,
}

async fn download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> ApiResult<Json<DownloadResponse>> {
    let result = state.orchestrator.handle(&request).await.map_err(|e| {
        error!(url = %request.url, error = %e, "download failed");
        ApiError::from(e)
    })?;

    Ok(Json(DownloadResponse {
        file: format!("/api/file/{}", result.file_name),
        title: result.title,
        platform: result.platform.to_string(),
    }))
}

async fn get_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    // The output directory is flat; anything that looks like a path is not
    // one of our files.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::not_found("File not found"));
    }

    let path = state.orchestrator.output_dir().join(&filename);
    if !path.exists() {
        return Err(ApiError::not_found("File not found"));
    }

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| ApiError::internal(format!("failed to open {filename}: {e}")))?;
    let stream = ReaderStream::new(file);

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(response.into_response())
}
