//! Recipe categories.

use std::fmt;

use serde::Serialize;

use super::CategoryId;
use super::text::{TextViolation, bounded};

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX: usize = 100;

/// Validation errors for category input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Name exceeds [`CATEGORY_NAME_MAX`] characters.
    NameTooLong,
}

impl CategoryValidationError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong => "name_too_long",
        }
    }
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::NameTooLong => write!(
                f,
                "category name must be at most {CATEGORY_NAME_MAX} characters"
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// Trimmed, non-empty category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate a raw category name.
    pub fn new(raw: &str) -> Result<Self, CategoryValidationError> {
        bounded(raw, CATEGORY_NAME_MAX)
            .map(Self)
            .map_err(|err| match err {
                TextViolation::Empty => CategoryValidationError::EmptyName,
                TextViolation::TooLong => CategoryValidationError::NameTooLong,
            })
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub revision: u32,
}
