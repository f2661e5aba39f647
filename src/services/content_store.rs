//! src/services/content_store.rs
//!
//! ContentStore - places uploaded videos on local disk beneath
//! `root/{YYYY}/{MM}/{DD}/{uuid}.{ext}`, resolves identifiers back to open
//! file handles, and reclaims emptied date partitions on delete. There is no
//! metadata database; the relative path *is* the identifier.

use crate::{
    config::StorageConfig,
    models::stored_object::{StoredObject, StoredObjectHandle},
};
use bytes::Bytes;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use futures::{Stream, StreamExt, pin_mut, stream};
use std::{
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Path prefix stored objects are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MAX_OBJECT_ID_LEN: usize = 1024;
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot store empty file")]
    EmptyPayload,
    #[error("file size {size} exceeds maximum limit of {max} bytes")]
    PayloadTooLarge { size: u64, max: u64 },
    #[error("cannot store file with relative path outside current directory")]
    UnsafeFilename,
    #[error("upload interrupted: {0}")]
    UploadInterrupted(#[source] io::Error),
    #[error("invalid object identifier")]
    InvalidObjectId,
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("{context}: {source}")]
    Unavailable {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// True for rejected uploads: the caller sent something we will not store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StorageError::EmptyPayload
                | StorageError::PayloadTooLarge { .. }
                | StorageError::UnsafeFilename
                | StorageError::UploadInterrupted(_)
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

fn unavailable(context: impl Into<String>) -> impl FnOnce(io::Error) -> StorageError {
    let context = context.into();
    move |source| StorageError::Unavailable { context, source }
}

/// ContentStore provides the storage half of video serving:
/// - Store an upload under a date partition with a generated name
/// - Resolve an identifier to an open, readable handle
/// - Delete an object and prune empty partitions
/// - Build the public URL for an identifier
///
/// Cloning is cheap; every clone shares the same configuration.
#[derive(Clone, Debug)]
pub struct ContentStore {
    config: Arc<StorageConfig>,

    /// Canonical form of `config.root`, used for containment checks.
    root: PathBuf,
}

impl ContentStore {
    /// Create the store, creating the root directory if it does not exist.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.root).await.map_err(unavailable(format!(
            "could not initialize storage location {}",
            config.root.display()
        )))?;
        let root = fs::canonicalize(&config.root)
            .await
            .map_err(unavailable("could not resolve storage location"))?;

        info!("Initialized storage location at {}", root.display());
        Ok(Self {
            config: Arc::new(config),
            root,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an in-memory payload and return its identifier.
    ///
    /// `declared_size` is what the client claimed; it is checked against the
    /// limit before anything touches the disk.
    pub async fn store(
        &self,
        payload: Bytes,
        original_filename: &str,
        declared_size: u64,
    ) -> StorageResult<String> {
        if payload.is_empty() {
            return Err(StorageError::EmptyPayload);
        }
        let actual = payload.len() as u64;
        if actual > self.config.max_upload_size {
            return Err(StorageError::PayloadTooLarge {
                size: actual,
                max: self.config.max_upload_size,
            });
        }

        let body = stream::once(async move { Ok::<_, io::Error>(payload) });
        let stored = self
            .store_stream(original_filename, Some(declared_size), body)
            .await?;
        Ok(stored.id)
    }

    /// Stream an upload to disk.
    ///
    /// - Validates the declared size and client filename up front.
    /// - Writes to a hidden temp file in the destination partition.
    /// - Enforces the size limit while streaming.
    /// - fsyncs and renames into the final name.
    ///
    /// A failed or rejected upload never leaves a file at the final name.
    pub async fn store_stream<S>(
        &self,
        original_filename: &str,
        declared_size: Option<u64>,
        body: S,
    ) -> StorageResult<StoredObject>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        self.validate_upload(original_filename, declared_size)?;

        let relative_dir = date_partition(Local::now().date_naive());
        let file_name = unique_filename(original_filename);
        let dir = self.root.join(&relative_dir);
        let tmp_path = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        let file = create_temp(&dir, &tmp_path).await?;

        let size = match self.write_temp(file, body).await {
            Ok(0) => Err(StorageError::EmptyPayload),
            other => other,
        };
        let size = match size {
            Ok(size) => size,
            Err(err) => {
                self.discard_temp(&tmp_path, &dir).await;
                return Err(err);
            }
        };

        let final_path = dir.join(&file_name);
        if let Err(err) = fs::rename(&tmp_path, &final_path).await {
            self.discard_temp(&tmp_path, &dir).await;
            return Err(unavailable("failed to store video file")(err));
        }

        let id = format!("{}/{}", relative_dir, file_name);
        info!("Stored video file at {} ({} bytes)", id, size);
        Ok(StoredObject { id, size })
    }

    async fn write_temp<S>(&self, mut file: File, body: S) -> StorageResult<u64>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        let max = self.config.max_upload_size;
        let mut size: u64 = 0;
        pin_mut!(body);
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(StorageError::UploadInterrupted)?;
            size += chunk.len() as u64;
            if size > max {
                return Err(StorageError::PayloadTooLarge { size, max });
            }
            file.write_all(&chunk)
                .await
                .map_err(unavailable("failed to write video file"))?;
        }
        file.flush()
            .await
            .map_err(unavailable("failed to flush video file"))?;
        file.sync_all()
            .await
            .map_err(unavailable("failed to sync video file"))?;
        Ok(size)
    }

    /// Remove a failed upload's temp file and any partition it created.
    async fn discard_temp(&self, tmp_path: &Path, dir: &Path) {
        match fs::remove_file(tmp_path).await {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!("could not remove temp file {}: {}", tmp_path.display(), err),
        }
        self.prune_empty_dirs(dir).await;
    }

    /// Resolve an identifier to an open handle for reading.
    ///
    /// Returns NotFound when the file is missing, unreadable, or not a
    /// regular file, and InvalidObjectId when the resolved path escapes the
    /// root (e.g. through a symlink).
    pub async fn load_as_resource(&self, id: &str) -> StorageResult<StoredObjectHandle> {
        self.ensure_id_safe(id)?;
        let path = fs::canonicalize(self.root.join(id))
            .await
            .map_err(|err| not_found_or(id, err, "could not resolve video file"))?;
        self.ensure_within_root(id, &path)?;

        let file = File::open(&path)
            .await
            .map_err(|err| not_found_or(id, err, "could not open video file"))?;
        let metadata = file
            .metadata()
            .await
            .map_err(unavailable("could not stat video file"))?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(StoredObjectHandle {
            path,
            size: metadata.len(),
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            file,
        })
    }

    /// Delete an object and prune the date partitions it leaves empty.
    ///
    /// A directory target is removed recursively. Pruning is best-effort and
    /// never changes the outcome.
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.ensure_id_safe(id)?;
        let candidate = self.root.join(id);
        let (Some(parent), Some(name)) = (candidate.parent(), candidate.file_name()) else {
            return Err(StorageError::InvalidObjectId);
        };
        // Canonicalize only the parent so a symlinked entry is unlinked, not followed.
        let parent = fs::canonicalize(parent)
            .await
            .map_err(|err| not_found_or(id, err, "could not resolve video directory"))?;
        self.ensure_within_root(id, &parent)?;
        let target = parent.join(name);

        let metadata = fs::symlink_metadata(&target)
            .await
            .map_err(|err| not_found_or(id, err, "could not stat video file"))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&target).await
        } else {
            fs::remove_file(&target).await
        };
        removed.map_err(|err| not_found_or(id, err, format!("failed to delete file {}", id)))?;
        debug!("removed physical file {}", target.display());

        self.prune_empty_dirs(&parent).await;
        info!("Successfully deleted video file {}", id);
        Ok(())
    }

    /// Public URL for an identifier.
    ///
    /// Uses the configured public base when set, otherwise `request_base`
    /// (scheme and authority of the current request).
    pub fn generate_public_url(&self, id: &str, request_base: &str) -> String {
        let base = self
            .config
            .public_base_url
            .as_deref()
            .unwrap_or(request_base);
        format!(
            "{}{}/{}",
            base.trim_end_matches('/'),
            PUBLIC_PREFIX,
            id.trim_start_matches('/')
        )
    }

    fn validate_upload(&self, filename: &str, declared_size: Option<u64>) -> StorageResult<()> {
        match declared_size {
            Some(size) if size > self.config.max_upload_size => {
                return Err(StorageError::PayloadTooLarge {
                    size,
                    max: self.config.max_upload_size,
                });
            }
            _ => {}
        }
        if filename.contains("..") {
            return Err(StorageError::UnsafeFilename);
        }
        Ok(())
    }

    /// Reject identifiers that could not have come from `store`.
    ///
    /// Every component must be a plain name: no root, no `.` or `..`.
    fn ensure_id_safe(&self, id: &str) -> StorageResult<()> {
        if id.is_empty() || id.len() > MAX_OBJECT_ID_LEN {
            return Err(StorageError::InvalidObjectId);
        }
        if id.starts_with('/') || id.contains("..") {
            return Err(StorageError::InvalidObjectId);
        }
        if id.bytes().any(|b| b.is_ascii_control() || b == b'\\') {
            return Err(StorageError::InvalidObjectId);
        }
        if !Path::new(id)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidObjectId);
        }
        Ok(())
    }

    fn ensure_within_root(&self, id: &str, resolved: &Path) -> StorageResult<()> {
        if resolved.starts_with(&self.root) {
            Ok(())
        } else {
            warn!(
                "identifier {} resolved outside storage root to {}",
                id,
                resolved.display()
            );
            Err(StorageError::InvalidObjectId)
        }
    }

    /// Remove empty directories from `start` upward, stopping below the root.
    ///
    /// Stops when:
    /// - directory not empty
    /// - directory not found
    /// - reached root
    /// - encountered unexpected I/O errors (logged)
    async fn prune_empty_dirs(&self, start: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(&self.root) && current != self.root {
            match fs::remove_dir(&current).await {
                Ok(_) => {
                    debug!("pruned empty directory {}", current.display());
                    match current.parent() {
                        Some(parent) => current = parent.to_path_buf(),
                        None => break,
                    }
                }
                Err(err) if err.kind() == ErrorKind::NotFound => break,
                Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => break,
                Err(err) => {
                    warn!("failed to prune directory {}: {}", current.display(), err);
                    break;
                }
            }
        }
    }
}

/// Create the date partition and a temp file inside it.
async fn create_temp(dir: &Path, tmp_path: &Path) -> StorageResult<File> {
    let mut retried = false;
    loop {
        fs::create_dir_all(dir)
            .await
            .map_err(unavailable("failed to create date partition"))?;
        match File::create(tmp_path).await {
            Ok(file) => return Ok(file),
            // A concurrent delete may prune the empty partition in between.
            Err(err) if err.kind() == ErrorKind::NotFound && !retried => retried = true,
            Err(err) => return Err(unavailable("failed to create temp file")(err)),
        }
    }
}

/// Map "missing" style errors to NotFound and everything else to Unavailable.
fn not_found_or(id: &str, err: io::Error, context: impl Into<String>) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::PermissionDenied => {
            StorageError::NotFound(id.to_string())
        }
        _ => unavailable(context)(err),
    }
}

/// `YYYY/MM/DD` for the given date.
fn date_partition(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// Random base name plus the client's extension, when it has a usable one.
fn unique_filename(original_filename: &str) -> String {
    let base = Uuid::new_v4();
    match extension_of(original_filename) {
        Some(ext) => format!("{}.{}", base, ext),
        None => base.to_string(),
    }
}

/// Extension of the last path component, if it is short and alphanumeric.
fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(StorageConfig::new(dir.path().join("videos")))
            .await
            .unwrap();
        (dir, store)
    }

    async fn is_empty_dir(path: &Path) -> bool {
        let mut entries = fs::read_dir(path).await.unwrap();
        entries.next_entry().await.unwrap().is_none()
    }

    #[tokio::test]
    async fn new_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a").join("b");
        let store = ContentStore::new(StorageConfig::new(&root)).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), fs::canonicalize(&root).await.unwrap());
    }

    #[tokio::test]
    async fn store_then_load_round_trips_bytes() {
        let (_dir, store) = test_store().await;
        let payload = Bytes::from((0..=255u8).cycle().take(70_000).collect::<Vec<_>>());

        let id = store
            .store(payload.clone(), "holiday clip.MP4", payload.len() as u64)
            .await
            .unwrap();

        let handle = store.load_as_resource(&id).await.unwrap();
        assert_eq!(handle.size, payload.len() as u64);
        assert_eq!(handle.extension().as_deref(), Some("mp4"));
        assert!(handle.last_modified.is_some());
        let on_disk = fs::read(&handle.path).await.unwrap();
        assert_eq!(on_disk, payload.to_vec());
    }

    #[tokio::test]
    async fn identifier_is_date_partitioned_with_generated_name() {
        let (_dir, store) = test_store().await;
        let before = date_partition(Local::now().date_naive());
        let id = store
            .store(Bytes::from_static(b"video"), "my movie.webm", 5)
            .await
            .unwrap();
        let after = date_partition(Local::now().date_naive());

        let (partition, file_name) = id.rsplit_once('/').unwrap();
        assert!(partition == before || partition == after, "id {}", id);
        let (stem, ext) = file_name.rsplit_once('.').unwrap();
        assert_eq!(ext, "webm");
        assert!(Uuid::parse_str(stem).is_ok());
        assert!(!id.contains("movie"));
    }

    #[tokio::test]
    async fn filenames_without_usable_extension_get_bare_uuid() {
        let (_dir, store) = test_store().await;
        for name in ["noext", "weird.ex t", ""] {
            let id = store.store(Bytes::from_static(b"x"), name, 1).await.unwrap();
            let file_name = id.rsplit('/').next().unwrap();
            assert!(Uuid::parse_str(file_name).is_ok(), "{} -> {}", name, id);
        }
    }

    #[tokio::test]
    async fn traversal_filename_rejected_before_any_write() {
        let (_dir, store) = test_store().await;
        let err = store
            .store(Bytes::from_static(b"root:x:0:0"), "../../etc/passwd", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UnsafeFilename));
        assert!(err.is_validation());
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let (_dir, store) = test_store().await;
        let err = store.store(Bytes::new(), "a.mp4", 0).await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyPayload));

        let empty = stream::empty::<io::Result<Bytes>>();
        let err = store.store_stream("a.mp4", None, empty).await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyPayload));
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn emptiness_follows_payload_not_declared_size() {
        let (_dir, store) = test_store().await;
        let id = store
            .store(Bytes::from_static(b"abc"), "a.mp4", 0)
            .await
            .unwrap();
        let handle = store.load_as_resource(&id).await.unwrap();
        assert_eq!(handle.size, 3);

        let err = store.store(Bytes::new(), "a.mp4", 3).await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyPayload));
    }

    #[tokio::test]
    async fn declared_size_over_limit_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = StorageConfig::new(dir.path());
        config.max_upload_size = 4;
        let store = ContentStore::new(config).await.unwrap();

        let err = store
            .store(Bytes::from_static(b"abc"), "a.mp4", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::PayloadTooLarge { size: 5, max: 4 }));
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn oversized_stream_is_aborted_and_cleaned_up() {
        let dir = TempDir::new().unwrap();
        let mut config = StorageConfig::new(dir.path());
        config.max_upload_size = 8;
        let store = ContentStore::new(config).await.unwrap();

        let chunks = vec![
            Ok(Bytes::from_static(b"12345")),
            Ok(Bytes::from_static(b"67890")),
        ];
        let err = store
            .store_stream("a.mp4", None, stream::iter(chunks))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::PayloadTooLarge { size: 10, max: 8 }));
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn failing_stream_leaves_nothing_behind() {
        let (_dir, store) = test_store().await;
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(ErrorKind::ConnectionReset, "client went away")),
        ];
        let err = store
            .store_stream("a.mp4", None, stream::iter(chunks))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UploadInterrupted(_)));
        assert!(err.is_validation());
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn discard_temp_removes_temp_file_and_new_partition() {
        let (_dir, store) = test_store().await;
        let dir = store.root().join("2024/02/29");
        let tmp_path = dir.join(".tmp-upload");
        drop(create_temp(&dir, &tmp_path).await.unwrap());
        assert!(tmp_path.exists());

        store.discard_temp(&tmp_path, &dir).await;
        assert!(!store.root().join("2024").exists());
        assert!(is_empty_dir(store.root()).await);

        // Already gone: still prunes and does not fail.
        fs::create_dir_all(&dir).await.unwrap();
        store.discard_temp(&tmp_path, &dir).await;
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn delete_then_load_is_not_found() {
        let (_dir, store) = test_store().await;
        let id = store
            .store(Bytes::from_static(b"frames"), "a.mp4", 6)
            .await
            .unwrap();

        store.delete(&id).await.unwrap();
        let err = store.load_as_resource(&id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        let err = store.delete(&id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_only_object_prunes_partitions_but_keeps_root() {
        let (_dir, store) = test_store().await;
        let id = store
            .store(Bytes::from_static(b"frames"), "a.mp4", 6)
            .await
            .unwrap();
        let year = id.split('/').next().unwrap().to_string();
        assert!(store.root().join(&year).is_dir());

        store.delete(&id).await.unwrap();
        assert!(!store.root().join(&year).exists());
        assert!(store.root().is_dir());
        assert!(is_empty_dir(store.root()).await);
    }

    #[tokio::test]
    async fn delete_keeps_partition_with_other_objects() {
        let (_dir, store) = test_store().await;
        let first = store.store(Bytes::from_static(b"1"), "a.mp4", 1).await.unwrap();
        let second = store.store(Bytes::from_static(b"2"), "b.mp4", 1).await.unwrap();

        store.delete(&first).await.unwrap();
        let handle = store.load_as_resource(&second).await.unwrap();
        assert_eq!(handle.size, 1);
    }

    #[tokio::test]
    async fn delete_removes_directory_targets_recursively() {
        let (_dir, store) = test_store().await;
        let nested = store.root().join("2020/01/02/stray");
        fs::create_dir_all(nested.join("inner")).await.unwrap();
        fs::write(nested.join("inner/file"), b"x").await.unwrap();

        store.delete("2020/01/02/stray").await.unwrap();
        assert!(!store.root().join("2020").exists());
    }

    #[tokio::test]
    async fn crafted_identifiers_are_rejected() {
        let (_dir, store) = test_store().await;
        for id in [
            "",
            "../secret",
            "2024/../../etc/passwd",
            "/etc/passwd",
            "./2024/a.mp4",
            "a\\b",
            "a\0b",
        ] {
            let err = store.load_as_resource(id).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidObjectId), "{:?}", id);
            let err = store.delete(id).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidObjectId), "{:?}", id);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_escaping_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("outside.mp4");
        fs::write(&outside, b"secret").await.unwrap();
        let store = ContentStore::new(StorageConfig::new(dir.path().join("root")))
            .await
            .unwrap();
        std::os::unix::fs::symlink(&outside, store.root().join("link.mp4")).unwrap();

        let err = store.load_as_resource("link.mp4").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidObjectId));

        // Deleting removes the link itself, never the target.
        store.delete("link.mp4").await.unwrap();
        assert!(outside.exists());
    }

    #[tokio::test]
    async fn loading_a_directory_is_not_found() {
        let (_dir, store) = test_store().await;
        fs::create_dir_all(store.root().join("2024/05")).await.unwrap();
        let err = store.load_as_resource("2024/05").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn public_url_uses_request_base_or_configured_base() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(StorageConfig::new(dir.path())).await.unwrap();
        assert_eq!(
            store.generate_public_url("2024/05/01/abc.mp4", "http://localhost:8080/"),
            "http://localhost:8080/uploads/2024/05/01/abc.mp4"
        );

        let mut config = StorageConfig::new(dir.path());
        config.public_base_url = Some("https://cdn.example.com".into());
        let store = ContentStore::new(config).await.unwrap();
        assert_eq!(
            store.generate_public_url("2024/05/01/abc.mp4", "http://ignored"),
            "https://cdn.example.com/uploads/2024/05/01/abc.mp4"
        );
    }

    #[test]
    fn extension_uses_last_component_only() {
        assert_eq!(extension_of("dir.v2/clip.mkv"), Some("mkv"));
        assert_eq!(extension_of("C:\\videos\\clip.mov"), Some("mov"));
        assert_eq!(extension_of("dir.v2/clip"), None);
        assert_eq!(extension_of("clip."), None);
    }

    #[test]
    fn date_partition_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_partition(date), "2024/03/07");
    }
}
