//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are PHC strings carrying their own salt and parameters, so a stored
//! value can be verified without any side table. Both operations are CPU-bound
//! and run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, PlainPassword, TraceId};

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher.
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(secret: &[u8]) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret, &salt)
        .map(|hash| hash.to_string())
}

fn verify_blocking(secret: &[u8], stored: &str) -> bool {
    let parsed = match password_hash::PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(%error, "stored password hash is not a PHC string");
            return false;
        }
    };
    Argon2::default().verify_password(secret, &parsed).is_ok()
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError> {
        let secret = Zeroizing::new(password.expose().as_bytes().to_vec());
        let encoded = TraceId::spawn_blocking(move || hash_blocking(&secret))
            .await
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &str,
        stored: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        let stored = stored.as_ref().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&secret, &stored))
            .await
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }
}
