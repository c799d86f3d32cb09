//! Driving port for login.
//!
//! Inbound adapters call it to check credentials without knowing how accounts
//! or password hashes are stored, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Account details established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: String,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the account they belong to.
    ///
    /// Every credential mismatch yields the same `unauthorized` error so
    /// callers cannot tell an unknown email from a wrong password.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}
