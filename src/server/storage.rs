//! Media storage for uploaded robot images and videos.
//!
//! Storage sits behind the [`MediaStorage`] trait so the backend can be swapped; the
//! server ships with [`LocalMediaStorage`], which writes files below the upload
//! directory and serves them under `/uploads`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;

use crate::server::{error::storage::StorageError, util::random::random_hex};

/// URL prefix under which locally stored media is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Backend storing uploaded media objects and returning their public URLs.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores an object under a fresh collision-resistant name.
    ///
    /// # Arguments
    /// - `folder` - Logical folder, e.g. `robots/images`
    /// - `original_name` - Client file name, only its extension is kept
    /// - `content_type` - MIME type reported by the client
    /// - `bytes` - Object contents
    ///
    /// # Returns
    /// - `Ok(String)` - Public URL of the stored object
    /// - `Err(StorageError)` - Object could not be written
    async fn put(
        &self,
        folder: &str,
        original_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError>;

    /// Deletes the object behind a URL previously returned by [`MediaStorage::put`].
    ///
    /// Deleting an object that is already gone succeeds.
    ///
    /// # Returns
    /// - `Ok(())` - Object removed or absent
    /// - `Err(StorageError::ForeignUrl)` - URL does not belong to this storage
    /// - `Err(StorageError::Io)` - Removal failed
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Stores media on the local filesystem below `root`.
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a public URL back to a path below `root`.
    ///
    /// Rejects URLs outside [`UPLOADS_PREFIX`] and any path that would escape the root.
    fn path_for(&self, url: &str) -> Result<PathBuf, StorageError> {
        let relative = url
            .strip_prefix(UPLOADS_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        let relative = Path::new(relative);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !only_normal || relative.as_os_str().is_empty() {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn put(
        &self,
        folder: &str,
        original_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let folder = sanitize_folder(folder);
        let file_name = object_name(original_name, Utc::now().timestamp_millis());

        let dir = self.root.join(&folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &bytes).await?;

        tracing::debug!(
            "Stored {} ({} bytes, {}) in {}",
            file_name,
            bytes.len(),
            content_type,
            folder
        );

        Ok(format!("{}/{}/{}", UPLOADS_PREFIX, folder, file_name))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let path = self.path_for(url)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Builds `<timestamp>-<16 random hex>.<ext>`, keeping a sanitized lowercase extension.
fn object_name(original_name: &str, timestamp: i64) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .take(10)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}-{}.{}", timestamp, random_hex(8), ext),
        None => format!("{}-{}", timestamp, random_hex(8)),
    }
}

/// Keeps `[a-z0-9_-]` path segments so callers cannot write outside the root.
fn sanitize_folder(folder: &str) -> String {
    let segments: Vec<String> = folder
        .split('/')
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        "misc".to_string()
    } else {
        segments.join("/")
    }
}
