//! Filesystem-backed `PhotoStorage`.
//!
//! Photos land in a single directory opened as a `cap_std` capability, so no
//! path derived from a request can escape it. Every upload is stored under a
//! fresh UUID; the client-declared filename only contributes its extension.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{PhotoStorage, PhotoStorageError};
use crate::domain::{PhotoUpload, TraceId};

/// Public URL prefix under which stored photos are served.
pub const PHOTO_URL_PREFIX: &str = "/images/";

/// Stores photos as files in one directory.
#[derive(Clone)]
pub struct FilesystemPhotoStorage {
    dir: Arc<Dir>,
}

impl FilesystemPhotoStorage {
    /// Open (creating if needed) the photo directory at `root`.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn storage_name(photo: &PhotoUpload) -> String {
    let id = Uuid::new_v4().simple();
    match photo.extension() {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Map a public path back to its file name, refusing anything outside the
/// photo directory.
fn file_name_of(public_path: &str) -> Result<&str, PhotoStorageError> {
    public_path
        .strip_prefix(PHOTO_URL_PREFIX)
        .filter(|name| {
            !name.is_empty() && !name.contains(['/', '\\']) && *name != "." && *name != ".."
        })
        .ok_or_else(|| PhotoStorageError::foreign_path(public_path))
}

#[async_trait]
impl PhotoStorage for FilesystemPhotoStorage {
    async fn store(&self, photo: &PhotoUpload) -> Result<String, PhotoStorageError> {
        let name = storage_name(photo);
        let dir = Arc::clone(&self.dir);
        let bytes = photo.bytes().to_vec();
        let target = name.clone();
        TraceId::spawn_blocking(move || dir.write(&target, bytes))
            .await
            .map_err(|err| PhotoStorageError::write(err.to_string()))?
            .map_err(|err| PhotoStorageError::write(err.to_string()))?;
        info!(file = %name, "stored recipe photo");
        Ok(format!("{PHOTO_URL_PREFIX}{name}"))
    }

    async fn remove(&self, public_path: &str) -> Result<(), PhotoStorageError> {
        let name = file_name_of(public_path)?.to_owned();
        let dir = Arc::clone(&self.dir);
        let target = name.clone();
        let outcome = TraceId::spawn_blocking(move || dir.remove_file(&target))
            .await
            .map_err(|err| PhotoStorageError::remove(err.to_string()))?;
        match outcome {
            Ok(()) => {
                info!(file = %name, "removed recipe photo");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(file = %name, "photo already absent");
                Ok(())
            }
            Err(err) => Err(PhotoStorageError::remove(err.to_string())),
        }
    }
}
