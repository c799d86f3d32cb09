//! Port for salted password hashing.

use async_trait::async_trait;

use crate::domain::{PasswordHash, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing could not be completed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Derives and checks salted password hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a stored hash. A malformed stored hash never
    /// matches.
    async fn verify(
        &self,
        password: &str,
        stored: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
