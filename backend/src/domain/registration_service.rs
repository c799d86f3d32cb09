//! Self-registration of visitor accounts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use super::ports::{
    EntityStoreError, PasswordHasher, PasswordHasherError, RegistrationService, RoleRepository,
    USERS_EMAIL_KEY, UserRepository,
};
use super::store_errors::{DUPLICATE_EMAIL_MESSAGE, duplicate_email, map_store_error};
use super::{DEFAULT_ROLE_NAME, Error, NewUser, RegistrationRequest, UserView};

/// Reasons a registration can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Another account already uses the email.
    #[error("{DUPLICATE_EMAIL_MESSAGE}")]
    DuplicateEmail,
    /// The default role has not been provisioned.
    #[error("default role {DEFAULT_ROLE_NAME} is missing")]
    MissingDefaultRole,
    /// The password could not be hashed.
    #[error(transparent)]
    Hashing(#[from] PasswordHasherError),
    /// The account store failed.
    #[error(transparent)]
    Store(#[from] EntityStoreError),
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::DuplicateEmail => duplicate_email(),
            RegistrationError::MissingDefaultRole => {
                Error::service_unavailable("registration is not available")
                    .with_details(json!({ "code": "missing_default_role" }))
            }
            RegistrationError::Hashing(err) => Error::internal(err.to_string()),
            RegistrationError::Store(err) => map_store_error("user", err),
        }
    }
}

/// Registration service assigning every new account the default role.
#[derive(Clone)]
pub struct UserRegistrationService<U, R, H> {
    users: Arc<U>,
    roles: Arc<R>,
    hasher: Arc<H>,
}

impl<U, R, H> UserRegistrationService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    /// Create a new service over the given ports.
    pub fn new(users: Arc<U>, roles: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            users,
            roles,
            hasher,
        }
    }

    /// Register `request`, reporting failures in registration terms.
    pub async fn try_register(
        &self,
        request: RegistrationRequest,
    ) -> Result<UserView, RegistrationError> {
        if self
            .users
            .find_by_email(request.email.as_ref())
            .await?
            .is_some()
        {
            return Err(RegistrationError::DuplicateEmail);
        }

        let Some(role) = self.roles.find_by_name(DEFAULT_ROLE_NAME).await? else {
            error!(role = DEFAULT_ROLE_NAME, "default role missing; registration disabled");
            return Err(RegistrationError::MissingDefaultRole);
        };

        let password_hash = self.hasher.hash(&request.password).await?;
        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role_id: role.id,
        };
        let user = match self.users.create(&new_user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration for the same email.
            Err(EntityStoreError::UniqueViolation { constraint })
                if constraint == USERS_EMAIL_KEY =>
            {
                return Err(RegistrationError::DuplicateEmail);
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = %user.id, "account registered");
        Ok(UserView {
            user,
            role_name: role.name,
        })
    }
}

#[async_trait]
impl<U, R, H> RegistrationService for UserRegistrationService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegistrationRequest) -> Result<UserView, Error> {
        self.try_register(request).await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockRoleRepository, MockUserRepository};
    use crate::domain::{
        EmailAddress, ErrorCode, PasswordHash, Role, RoleId, RoleName, User, UserId, Username,
    };

    type Service =
        UserRegistrationService<MockUserRepository, MockRoleRepository, MockPasswordHasher>;

    fn service(
        users: MockUserRepository,
        roles: MockRoleRepository,
        hasher: MockPasswordHasher,
    ) -> Service {
        UserRegistrationService::new(Arc::new(users), Arc::new(roles), Arc::new(hasher))
    }

    fn request() -> RegistrationRequest {
        RegistrationRequest::try_from_parts("ana", "ana@x.com", "pass1").expect("valid request")
    }

    fn usuario() -> Role {
        Role {
            id: RoleId::new(2),
            name: RoleName::new(DEFAULT_ROLE_NAME).expect("role name"),
            revision: 1,
        }
    }

    fn stored(new_user: &NewUser) -> User {
        User {
            id: UserId::new(11),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role_id: new_user.role_id,
            revision: 1,
        }
    }

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(PasswordHash::new("$argon2id$fresh")));
        hasher
    }

    #[tokio::test]
    async fn new_accounts_get_the_default_role_and_a_hash() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.role_id == RoleId::new(2)
                    && user.password_hash.as_ref() == "$argon2id$fresh"
            })
            .return_once(|user| Ok(stored(user)));
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_name()
            .withf(|name| name == DEFAULT_ROLE_NAME)
            .return_once(|_| Ok(Some(usuario())));

        let view = service(users, roles, hasher())
            .register(request())
            .await
            .expect("registration succeeds");
        assert_eq!(view.role_name.as_ref(), DEFAULT_ROLE_NAME);
        assert_eq!(view.user.email, EmailAddress::new("ana@x.com").expect("email"));
    }

    #[tokio::test]
    async fn taken_email_is_rejected_before_hashing() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| {
            Ok(Some(User {
                id: UserId::new(1),
                username: Username::new("otra").expect("username"),
                email: EmailAddress::new("ana@x.com").expect("email"),
                password_hash: PasswordHash::new("x"),
                role_id: RoleId::new(2),
                revision: 1,
            }))
        });

        let error = service(users, MockRoleRepository::new(), MockPasswordHasher::new())
            .register(request())
            .await
            .expect_err("duplicate email");
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details = error.details().expect("details");
        assert_eq!(details["code"], "duplicate_email");
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_a_duplicate_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .return_once(|_| Err(EntityStoreError::unique_violation(USERS_EMAIL_KEY)));
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_name()
            .return_once(|_| Ok(Some(usuario())));

        let error = service(users, roles, hasher())
            .try_register(request())
            .await
            .expect_err("race lost");
        assert_eq!(error, RegistrationError::DuplicateEmail);
    }

    #[tokio::test]
    async fn missing_default_role_disables_registration() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().return_once(|_| Ok(None));

        let error = service(users, roles, MockPasswordHasher::new())
            .register(request())
            .await
            .expect_err("no default role");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(
            error.details().expect("details")["code"],
            "missing_default_role"
        );
    }
}
