//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    CategoryManagement, LoginService, RecipeManagement, RegistrationService, RoleManagement,
    UserManagement,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub categories: Arc<dyn CategoryManagement>,
    pub recipes: Arc<dyn RecipeManagement>,
    pub roles: Arc<dyn RoleManagement>,
    pub users: Arc<dyn UserManagement>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub categories: Arc<dyn CategoryManagement>,
    pub recipes: Arc<dyn RecipeManagement>,
    pub roles: Arc<dyn RoleManagement>,
    pub users: Arc<dyn UserManagement>,
    /// Time source for session issue and expiry checks.
    pub clock: Arc<dyn Clock>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle using the system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_clock(ports, Arc::new(DefaultClock))
    }

    /// Construct state from a ports bundle and an explicit clock.
    pub fn with_clock(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            login,
            registration,
            categories,
            recipes,
            roles,
            users,
        } = ports;
        Self {
            login,
            registration,
            categories,
            recipes,
            roles,
            users,
            clock,
        }
    }
}
