//! Port for storing uploaded recipe photos.

use async_trait::async_trait;

use crate::domain::PhotoUpload;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo storage adapters.
    pub enum PhotoStorageError {
        /// Writing the photo failed.
        Write { message: String } => "photo storage write failed: {message}",
        /// Removing a stored photo failed.
        Remove { message: String } => "photo storage removal failed: {message}",
        /// The path does not point into the photo store.
        ForeignPath { path: String } => "path {path} is not a stored photo",
    }
}

/// Storage for recipe photos.
///
/// Implementations choose a fresh, unique storage name for every upload and
/// return the public path under which the photo is served.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persist `photo` and return its public path.
    async fn store(&self, photo: &PhotoUpload) -> Result<String, PhotoStorageError>;

    /// Remove a photo previously returned by [`PhotoStorage::store`].
    async fn remove(&self, public_path: &str) -> Result<(), PhotoStorageError>;
}
