//! Best-effort removal of photos no recipe references any more.

use tracing::warn;

use super::ports::PhotoStorage;

/// Remove every photo in `paths`, logging and skipping failures.
pub(crate) async fn discard_photos<P>(photos: &P, paths: &[String])
where
    P: PhotoStorage + ?Sized,
{
    for path in paths {
        if let Err(err) = photos.remove(path).await {
            warn!(path = %path, error = %err, "orphaned photo could not be removed");
        }
    }
}
