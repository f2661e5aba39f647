//! Copies a resolved byte interval of a stored object into an HTTP response.
//!
//! The body is fed by a spawned task that reads the file through a fixed-size
//! buffer and writes into an in-memory pipe. When the client goes away hyper
//! drops the read half of that pipe, the next write fails with `BrokenPipe`,
//! and the copy stops quietly.

use crate::{
    models::stored_object::StoredObjectHandle,
    services::range::{RangeError, ServeRange},
};
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use chrono::{DateTime, Utc};
use std::io::{self, ErrorKind, SeekFrom};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Used when the extension does not map to a known video type.
pub const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("client disconnected")]
    ClientDisconnected,
    #[error("failed to read video file: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write response body: {0}")]
    Write(#[source] io::Error),
}

/// True when a write failed because the peer closed or reset the connection.
pub fn is_client_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::UnexpectedEof
            | ErrorKind::WriteZero
    )
}

fn classify_write(err: io::Error) -> StreamError {
    if is_client_disconnect(&err) {
        StreamError::ClientDisconnected
    } else {
        StreamError::Write(err)
    }
}

/// Copy `length` bytes starting at `start` from `source` into `sink`.
///
/// Returns the number of bytes written, which is short of `length` only when
/// the source ran out first.
pub async fn copy_range<R, W>(
    source: &mut R,
    sink: &mut W,
    start: u64,
    length: u64,
    buffer_size: usize,
) -> Result<u64, StreamError>
where
    R: AsyncRead + AsyncSeek + Unpin,
    W: AsyncWrite + Unpin,
{
    source
        .seek(SeekFrom::Start(start))
        .await
        .map_err(StreamError::Read)?;

    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut remaining = length;
    while remaining > 0 {
        let want = remaining.min(buffer.len() as u64) as usize;
        let read = source
            .read(&mut buffer[..want])
            .await
            .map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }
        sink.write_all(&buffer[..read])
            .await
            .map_err(classify_write)?;
        remaining -= read as u64;
    }
    sink.flush().await.map_err(classify_write)?;

    Ok(length - remaining)
}

/// Content type for a file extension.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension.unwrap_or("") {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "ts" => "video/mp2t",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => DEFAULT_VIDEO_CONTENT_TYPE,
    }
}

/// Stream the interval described by `serve` out of `handle`.
///
/// `id` is only used for logging.
pub fn stream_response(
    handle: StoredObjectHandle,
    serve: ServeRange,
    buffer_size: usize,
    id: String,
) -> Response {
    let (start, length) = serve.span();
    let content_type = content_type_for(handle.extension().as_deref());
    let last_modified = handle.last_modified;

    let body = spawn_body(handle.file, start, length, buffer_size, id);
    build_response(body, serve, content_type, length, last_modified)
}

/// Body fed by a background copy of `length` bytes from `source`.
///
/// A read failure is logged once and ends the body early, short of the
/// advertised `Content-Length`, so the connection cannot be reused.
fn spawn_body<R>(mut source: R, start: u64, length: u64, buffer_size: usize, id: String) -> Body
where
    R: AsyncRead + AsyncSeek + Send + Unpin + 'static,
{
    let (reader, mut writer) = tokio::io::duplex(buffer_size.max(1));
    tokio::spawn(async move {
        match copy_range(&mut source, &mut writer, start, length, buffer_size).await {
            Ok(written) if written < length => debug!(
                "video {} ended after {} of {} bytes",
                id, written, length
            ),
            Ok(_) => {}
            Err(StreamError::ClientDisconnected) => {
                debug!("Client disconnected while streaming video: {}", id)
            }
            Err(err) => error!("Error streaming video {}: {}", id, err),
        }
    });

    Body::from_stream(ReaderStream::with_capacity(reader, buffer_size.max(1)))
}

/// Same status and headers as [`stream_response`], without a body.
pub fn head_response(handle: &StoredObjectHandle, serve: ServeRange) -> Response {
    let (_, length) = serve.span();
    let content_type = content_type_for(handle.extension().as_deref());
    build_response(
        Body::empty(),
        serve,
        content_type,
        length,
        handle.last_modified,
    )
}

/// Bodyless 400 or 416 for a rejected `Range` header.
pub fn range_error_response(err: RangeError) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = match err {
        RangeError::Malformed => StatusCode::BAD_REQUEST,
        RangeError::NotSatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
    };
    response
        .headers_mut()
        .insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    response
}

fn build_response(
    body: Body,
    serve: ServeRange,
    content_type: &'static str,
    length: u64,
    last_modified: Option<DateTime<Utc>>,
) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    set_video_headers(headers, content_type, length);
    if let Some(modified) = last_modified {
        let http_date = modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&http_date) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }

    match serve {
        ServeRange::Full { .. } => *response.status_mut() = StatusCode::OK,
        ServeRange::Partial(range) => {
            if let Ok(value) = HeaderValue::from_str(&range.content_range()) {
                headers.insert(header::CONTENT_RANGE, value);
            }
            *response.status_mut() = StatusCode::PARTIAL_CONTENT;
        }
    }
    response
}

fn set_video_headers(headers: &mut HeaderMap, content_type: &'static str, length: u64) {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    // Paths are reused across re-uploads; intermediaries must not cache them.
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
}
