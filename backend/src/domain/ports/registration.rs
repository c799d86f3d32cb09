//! Driving port for self-registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationRequest, UserView};

/// Creates accounts for new visitors with the default role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account.
    ///
    /// Fails with `conflict` (`details.code = "duplicate_email"`) when the
    /// email is taken and with `service_unavailable`
    /// (`details.code = "missing_default_role"`) when the default role has
    /// not been provisioned.
    async fn register(&self, request: RegistrationRequest) -> Result<UserView, Error>;
}
