//! Credential check backing the login endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::ports::{
    AuthenticatedUser, LoginService, PasswordHasher, PasswordHasherError, RoleRepository,
    UserRepository,
};
use super::store_errors::map_store_error;
use super::{Error, LoginCredentials};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Login service checking an email/password pair against stored accounts.
#[derive(Clone)]
pub struct CredentialLoginService<U, R, H> {
    users: Arc<U>,
    roles: Arc<R>,
    hasher: Arc<H>,
}

impl<U, R, H> CredentialLoginService<U, R, H> {
    /// Create a new service over the given ports.
    pub fn new(users: Arc<U>, roles: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            users,
            roles,
            hasher,
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("credential check failed: {error}"))
}

#[async_trait]
impl<U, R, H> LoginService for CredentialLoginService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_store_error("user", err))?
        else {
            info!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            info!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let Some(role) = self
            .roles
            .find_by_id(user.role_id)
            .await
            .map_err(|err| map_store_error("role", err))?
        else {
            error!(user_id = %user.id, role_id = %user.role_id, "user references a missing role");
            return Err(Error::internal("account role could not be resolved"));
        };

        info!(user_id = %user.id, role = %role.name, "login succeeded");
        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email.to_string(),
            role: role.name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockRoleRepository, MockUserRepository};
    use crate::domain::{
        EmailAddress, ErrorCode, PasswordHash, Role, RoleId, RoleName, User, UserId, Username,
    };
    use rstest::{fixture, rstest};

    type Service = CredentialLoginService<MockUserRepository, MockRoleRepository, MockPasswordHasher>;

    #[fixture]
    fn ana() -> User {
        User {
            id: UserId::new(7),
            username: Username::new("ana").expect("username"),
            email: EmailAddress::new("ana@x.com").expect("email"),
            password_hash: PasswordHash::new("$argon2id$stored"),
            role_id: RoleId::new(2),
            revision: 1,
        }
    }

    fn usuario() -> Role {
        Role {
            id: RoleId::new(2),
            name: RoleName::new("Usuario").expect("role name"),
            revision: 1,
        }
    }

    fn service(users: MockUserRepository, roles: MockRoleRepository, hasher: MockPasswordHasher) -> Service {
        CredentialLoginService::new(Arc::new(users), Arc::new(roles), Arc::new(hasher))
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("credentials shape")
    }

    #[rstest]
    #[tokio::test]
    async fn matching_credentials_carry_role_name(ana: User) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "ana@x.com")
            .return_once(move |_| Ok(Some(ana)));
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_id()
            .return_once(|_| Ok(Some(usuario())));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, _| password == "pass1")
            .return_once(|_, _| Ok(true));

        let user = service(users, roles, hasher)
            .authenticate(&credentials("ana@x.com", "pass1"))
            .await
            .expect("login succeeds");
        assert_eq!(user.user_id, UserId::new(7));
        assert_eq!(user.email, "ana@x.com");
        assert_eq!(user.role, "Usuario");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_identical(ana: User) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        let unknown = service(users, MockRoleRepository::new(), MockPasswordHasher::new())
            .authenticate(&credentials("nobody@x.com", "pass1"))
            .await
            .expect_err("unknown email");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(ana)));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(false));
        let wrong = service(users, MockRoleRepository::new(), hasher)
            .authenticate(&credentials("ana@x.com", "nope"))
            .await
            .expect_err("wrong password");

        assert_eq!(unknown.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown.code(), wrong.code());
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.details(), wrong.details());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_role_is_a_hard_failure(ana: User) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(ana)));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().return_once(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(true));

        let error = service(users, roles, hasher)
            .authenticate(&credentials("ana@x.com", "pass1"))
            .await
            .expect_err("role missing");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn store_outage_is_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(|_| Err(crate::domain::ports::EntityStoreError::connection("down")));
        let error = service(users, MockRoleRepository::new(), MockPasswordHasher::new())
            .authenticate(&credentials("ana@x.com", "pass1"))
            .await
            .expect_err("store down");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
