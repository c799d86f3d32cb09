//! Shared helpers for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error mapping from pool and Diesel errors to [`EntityStoreError`]
//! - Revision casting between database and domain types
//! - Disambiguation of zero-row optimistic updates
//! - Page window conversion for `OFFSET`/`LIMIT`

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::EntityStoreError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> EntityStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EntityStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors, keeping constraint names for
/// unique and foreign key violations.
pub(crate) fn map_diesel_error(error: DieselError) -> EntityStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => EntityStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => EntityStoreError::query("database query error"),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().unwrap_or("unknown").to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    EntityStoreError::unique_violation(constraint)
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    EntityStoreError::foreign_key_violation(constraint)
                }
                DatabaseErrorKind::ClosedConnection => {
                    EntityStoreError::connection("database connection error")
                }
                _ => EntityStoreError::query("database error"),
            }
        }
        _ => EntityStoreError::query("database error"),
    }
}

/// Cast database revision (i32) to domain revision (u32).
///
/// Revisions start at 1 and only grow, enforced by a check constraint.
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always positive in database"
)]
pub(crate) fn cast_revision(revision: i32) -> u32 {
    revision as u32
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(crate) fn cast_revision_for_db(revision: u32) -> i32 {
    revision as i32
}

/// Revision written by a successful update checked against `expected`.
pub(crate) fn next_revision(expected: u32) -> i32 {
    cast_revision_for_db(expected.saturating_add(1))
}

/// Convert a positive domain count (minutes, servings) to a column value.
pub(crate) fn count_for_db(value: u32, field: &str) -> Result<i32, EntityStoreError> {
    i32::try_from(value)
        .map_err(|_| EntityStoreError::query(format!("{field} {value} exceeds column range")))
}

/// Convert a page window bound to the `BIGINT` Diesel expects.
pub(crate) fn window_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Convert a `COUNT(*)` result to the unsigned total used by pages.
pub(crate) fn total_items(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Explain why an optimistic update touched zero rows.
///
/// `current` is the revision re-read after the update. A missing row yields
/// `Ok(None)`; a surviving row means another writer got there first.
pub(crate) fn disambiguate_update_failure<T>(
    current: Option<i32>,
    expected: u32,
) -> Result<Option<T>, EntityStoreError> {
    match current {
        None => Ok(None),
        Some(actual) => Err(EntityStoreError::revision_mismatch(
            expected,
            cast_revision(actual),
        )),
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`.
pub(crate) fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
