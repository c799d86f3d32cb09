//! Photo storage adapters.

mod filesystem_photo_storage;

pub use filesystem_photo_storage::{FilesystemPhotoStorage, PHOTO_URL_PREFIX};
