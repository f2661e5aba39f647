//! Defines routes for serving and managing stored videos.
//!
//! ## Structure
//! - **Health endpoints**
//!   - `GET    /healthz` - liveness
//!   - `GET    /readyz` - readiness (disk probe under the storage root)
//!
//! - **Video endpoints**
//!   - `POST   /uploads` - multipart upload, returns the stored id and URL
//!   - `GET    /uploads/{*path}` - stream a video (supports `Range`)
//!   - `HEAD   /uploads/{*path}` - headers only
//!   - `DELETE /uploads/{*path}` - delete a video
//!
//! The wildcard `*path` carries the full identifier, e.g. `2025/01/31/<uuid>.mp4`.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        video_handlers::{delete_video, head_video, stream_video, upload_video},
    },
    services::content_store::ContentStore,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Build and return the router for all video routes.
///
/// The router carries shared state (`ContentStore`) to all handlers. Upload
/// size is enforced by the store, so axum's default body limit is lifted on
/// the upload route.
pub fn routes() -> Router<ContentStore> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Video routes
        .route(
            "/uploads",
            post(upload_video).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/uploads/{*path}",
            get(stream_video).head(head_video).delete(delete_video),
        )
}
