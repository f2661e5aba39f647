//! HTTP handlers for stored videos.
//! Range resolution and byte copying are delegated to `services::range_streamer`;
//! placement on disk is delegated to `ContentStore`.

use crate::{
    errors::AppError,
    services::{
        content_store::ContentStore,
        range::{RangeError, resolve_range},
        range_streamer::{head_response, range_error_response, stream_response},
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use serde::Serialize;
use std::io;
use tracing::debug;

/// Multipart field carrying the upload.
const UPLOAD_FIELD: &str = "file";

/// Body returned by `POST /uploads`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub url: String,
    pub size: u64,
}

/// `GET /uploads/{*path}` - stream a video, honouring a single `Range`.
pub async fn stream_video(
    State(store): State<ContentStore>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let handle = store.load_as_resource(&path).await?;
    let config = store.config();

    let serve = match range_header(&headers)
        .and_then(|range| resolve_range(range, handle.size, config.chunk_size))
    {
        Ok(serve) => serve,
        Err(err) => {
            debug!("rejecting Range for {}: {}", path, err);
            return Ok(range_error_response(err));
        }
    };

    Ok(stream_response(handle, serve, config.buffer_size, path))
}

/// `HEAD /uploads/{*path}` - same headers as GET, no body.
pub async fn head_video(
    State(store): State<ContentStore>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let handle = store.load_as_resource(&path).await?;
    let serve = range_header(&headers)
        .and_then(|range| resolve_range(range, handle.size, store.config().chunk_size));

    Ok(match serve {
        Ok(serve) => head_response(&handle, serve),
        Err(err) => range_error_response(err),
    })
}

/// `POST /uploads` - store the multipart field `file` and return its id and URL.
pub async fn upload_video(
    State(store): State<ContentStore>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let body = field.map_err(io::Error::other);
        let stored = store.store_stream(&filename, None, body).await?;
        let url = store.generate_public_url(&stored.id, &request_base(&headers));

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                id: stored.id,
                url,
                size: stored.size,
            }),
        ));
    }

    Err(AppError::bad_request(format!(
        "multipart field `{}` is required",
        UPLOAD_FIELD
    )))
}

/// `DELETE /uploads/{*path}` - remove a video and its empty partitions.
pub async fn delete_video(
    State(store): State<ContentStore>,
    Path(path): Path<String>,
) -> Result<StatusCode, AppError> {
    store.delete(&path).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The `Range` header as text; non-UTF-8 values count as malformed.
fn range_header(headers: &HeaderMap) -> Result<Option<&str>, RangeError> {
    match headers.get(header::RANGE) {
        Some(value) => value.to_str().map(Some).map_err(|_| RangeError::Malformed),
        None => Ok(None),
    }
}

/// Scheme and authority the client used to reach us.
fn request_base(headers: &HeaderMap) -> String {
    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let scheme = first("x-forwarded-proto").unwrap_or("http");
    let host = first("x-forwarded-host")
        .or_else(|| first(header::HOST.as_str()))
        .unwrap_or("localhost");
    format!("{}://{}", scheme, host)
}
