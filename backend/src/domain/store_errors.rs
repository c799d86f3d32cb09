//! Translation of repository failures into domain errors.

use serde_json::json;
use tracing::warn;

use super::Error;
use super::ports::EntityStoreError;

/// Message for an email another account already owns.
pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "an account with this email already exists";

/// Conflict for an email that is already registered.
pub(crate) fn duplicate_email() -> Error {
    Error::conflict(DUPLICATE_EMAIL_MESSAGE)
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

/// Map a repository failure for `entity` ("recipe", "user", ...) to an error.
pub(crate) fn map_store_error(entity: &'static str, error: EntityStoreError) -> Error {
    match error {
        EntityStoreError::Connection { message } => {
            Error::service_unavailable(format!("{entity} store unavailable: {message}"))
        }
        EntityStoreError::Query { message } => {
            Error::internal(format!("{entity} store error: {message}"))
        }
        EntityStoreError::RevisionMismatch { expected, actual } => {
            revision_conflict(entity, expected, actual)
        }
        EntityStoreError::UniqueViolation { constraint } => {
            Error::conflict(format!("{entity} conflicts with an existing record"))
                .with_details(json!({ "code": "duplicate", "constraint": constraint }))
        }
        EntityStoreError::ForeignKeyViolation { constraint } => {
            Error::conflict(format!("{entity} references or is referenced by other records"))
                .with_details(json!({ "code": "referenced_record", "constraint": constraint }))
        }
    }
}

/// Optimistic concurrency failure.
pub(crate) fn revision_conflict(entity: &'static str, expected: u32, actual: u32) -> Error {
    warn!(entity, expected, actual, "concurrent modification detected");
    Error::conflict(format!("{entity} was modified concurrently")).with_details(json!({
        "code": "revision_mismatch",
        "expectedRevision": expected,
        "actualRevision": actual,
    }))
}

/// Uniform error for an unknown id.
pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("{entity} {id} not found"))
}

/// Check the caller's revision against the row just read.
///
/// The repository repeats the check atomically when writing, so a change that
/// lands between the read and the write is still rejected.
pub(crate) fn expected_revision(
    entity: &'static str,
    requested: u32,
    current: u32,
) -> Result<u32, Error> {
    if requested == current {
        Ok(requested)
    } else {
        Err(revision_conflict(entity, requested, current))
    }
}
