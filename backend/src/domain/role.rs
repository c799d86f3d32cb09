//! Roles grant a named permission level to users.

use std::fmt;

use serde::Serialize;

use super::RoleId;
use super::text::{TextViolation, bounded};

/// Role assigned to self-registered users.
pub const DEFAULT_ROLE_NAME: &str = "Usuario";
/// Role allowed to manage roles and users.
pub const ADMIN_ROLE_NAME: &str = "Administrador";
/// Maximum role name length in characters.
pub const ROLE_NAME_MAX: usize = 50;

/// Validation errors for role input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Name exceeds [`ROLE_NAME_MAX`] characters.
    NameTooLong,
}

impl RoleValidationError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong => "name_too_long",
        }
    }
}

impl fmt::Display for RoleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "role name must not be empty"),
            Self::NameTooLong => {
                write!(f, "role name must be at most {ROLE_NAME_MAX} characters")
            }
        }
    }
}

impl std::error::Error for RoleValidationError {}

/// Trimmed, non-empty role name of at most [`ROLE_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Validate a raw role name.
    ///
    /// # Examples
    /// ```
    /// use culinaria::domain::RoleName;
    ///
    /// assert_eq!(RoleName::new(" Usuario ").unwrap().as_ref(), "Usuario");
    /// assert!(RoleName::new("").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, RoleValidationError> {
        bounded(raw, ROLE_NAME_MAX).map(Self).map_err(|err| match err {
            TextViolation::Empty => RoleValidationError::EmptyName,
            TextViolation::TooLong => RoleValidationError::NameTooLong,
        })
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub revision: u32,
}

impl Role {
    /// Whether this role grants administrative access.
    pub fn is_admin(&self) -> bool {
        self.name.as_ref() == ADMIN_ROLE_NAME
    }
}
