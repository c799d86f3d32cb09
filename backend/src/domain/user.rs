//! User accounts and their validated fields.
//!
//! Passwords never appear in clear text outside [`PlainPassword`], which
//! zeroises its buffer on drop. Stored accounts only carry a
//! [`PasswordHash`].

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::text::{TextViolation, bounded};
use super::{RoleId, RoleName, UserId};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 50;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;
/// Maximum password length in characters.
pub const PASSWORD_MAX: usize = 64;

/// Validation errors for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Username exceeds [`USERNAME_MAX`] characters.
    UsernameTooLong,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email is not of the form `local@domain`.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
    /// Password exceeds [`PASSWORD_MAX`] characters.
    PasswordTooLong,
}

impl UserValidationError {
    /// Name of the offending input field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong => "username",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooLong => "password",
        }
    }

    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong => "username_too_long",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooLong => "password_too_long",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong => {
                write!(f, "username must be at most {USERNAME_MAX} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong => {
                write!(f, "password must be at most {PASSWORD_MAX} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Display name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        bounded(raw, USERNAME_MAX).map(Self).map_err(|err| match err {
            TextViolation::Empty => UserValidationError::EmptyUsername,
            TextViolation::TooLong => UserValidationError::UsernameTooLong,
        })
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Email address used as the login principal.
///
/// ## Invariants
/// - Trimmed, no interior whitespace.
/// - Exactly one `@` with non-empty text on both sides, and a dot-free
///   domain is accepted (intranet hosts).
///
/// Comparison is exact: addresses differing only by case are distinct
/// accounts.
///
/// # Examples
/// ```
/// use culinaria::domain::EmailAddress;
///
/// assert!(EmailAddress::new("ana@x.com").is_ok());
/// assert!(EmailAddress::new("ana.x.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate a raw email address.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let value = bounded(raw, EMAIL_MAX).map_err(|err| match err {
            TextViolation::Empty => UserValidationError::EmptyEmail,
            TextViolation::TooLong => UserValidationError::InvalidEmail,
        })?;
        if value.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(value))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clear-text password awaiting hashing or verification.
///
/// Whitespace is preserved; only emptiness and length are checked.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate a raw password.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(UserValidationError::PasswordTooLong);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(**redacted**)")
    }
}

/// Opaque salted password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub role_id: RoleId,
    pub revision: u32,
}

/// User account joined with its role name, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub user: User,
    pub role_name: RoleName,
}

/// Fields required to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub role_id: RoleId,
}

/// Replacement values for an existing user.
///
/// `password_hash` of `None` keeps the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: Option<PasswordHash>,
    pub role_id: RoleId,
    pub expected_revision: u32,
}
