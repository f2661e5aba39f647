//! Represents a video file stored beneath the content store root.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs::File;

/// Result of a successful upload.
///
/// The `id` is the only thing a caller needs to retain; everything else can be
/// recomputed from the file on disk.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// Relative identifier, `YYYY/MM/DD/<uuid>[.<ext>]`.
    pub id: String,

    /// Number of bytes written.
    pub size: u64,
}

/// A resolved, readable object, opened for a single request.
///
/// The handle owns its own file descriptor and is dropped with the response.
#[derive(Debug)]
pub struct StoredObjectHandle {
    /// Canonical absolute path of the file.
    pub path: PathBuf,

    /// Size in bytes, captured once when the handle was opened.
    pub size: u64,

    /// Last modification time reported by the filesystem.
    pub last_modified: Option<DateTime<Utc>>,

    /// Open read handle, positioned at the start of the file.
    pub file: File,
}

impl StoredObjectHandle {
    /// Lower-cased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}
