//! User account administration.
//!
//! Deleting a user removes the recipes they authored. Their stored photos are
//! discarded when the service was given photo storage.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{info, warn};

use super::photo_cleanup::discard_photos;
use super::ports::{
    EntityStoreError, PasswordHasher, PhotoStorage, RoleRepository, USERS_EMAIL_KEY, UserDraft,
    UserEdit, UserManagement, UserRepository,
};
use super::store_errors::{duplicate_email, expected_revision, map_store_error, not_found};
use super::{
    ADMIN_ROLE_NAME, EmailAddress, Error, Listing, NewUser, PlainPassword, RoleId, User,
    UserChanges, UserId, UserView, Username,
};

const ENTITY: &str = "user";

fn map_user_error(error: EntityStoreError) -> Error {
    match error {
        EntityStoreError::UniqueViolation { constraint } if constraint == USERS_EMAIL_KEY => {
            duplicate_email()
        }
        other => map_store_error(ENTITY, other),
    }
}

fn unknown_role(role_id: RoleId) -> Error {
    Error::invalid_request(format!("role {role_id} does not exist"))
        .with_details(json!({ "field": "roleId", "code": "unknown_role" }))
}

/// Outcome of [`UserService::provision_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminProvisioning {
    /// A new administrator account was created.
    Created(UserId),
    /// An account already owns the email; it was left untouched.
    AlreadyPresent(UserId),
}

/// User use-cases over account and role storage.
#[derive(Clone)]
pub struct UserService<U, R, H> {
    users: Arc<U>,
    roles: Arc<R>,
    hasher: Arc<H>,
    photos: Option<Arc<dyn PhotoStorage>>,
}

impl<U, R, H> UserService<U, R, H>
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
            photos: None,
        }
    }

    /// Discard the photos of cascaded recipes in `photos` on delete.
    #[must_use]
    pub fn with_photo_storage(mut self, photos: Arc<dyn PhotoStorage>) -> Self {
        self.photos = Some(photos);
        self
    }

    async fn view_of(&self, user: User) -> Result<UserView, Error> {
        let role = self
            .roles
            .find_by_id(user.role_id)
            .await
            .map_err(|err| map_store_error("role", err))?
            .ok_or_else(|| unknown_role(user.role_id))?;
        Ok(UserView {
            user,
            role_name: role.name,
        })
    }

    async fn ensure_role(&self, role_id: RoleId) -> Result<(), Error> {
        self.roles
            .find_by_id(role_id)
            .await
            .map_err(|err| map_store_error("role", err))?
            .map(|_| ())
            .ok_or_else(|| unknown_role(role_id))
    }

    /// Create an administrator account unless `email` is already registered.
    ///
    /// Fails when the `Administrador` role does not exist.
    pub async fn provision_admin(
        &self,
        username: Username,
        email: EmailAddress,
        password: PlainPassword,
    ) -> Result<AdminProvisioning, Error> {
        if let Some(existing) = self
            .users
            .find_by_email(email.as_ref())
            .await
            .map_err(map_user_error)?
        {
            return Ok(AdminProvisioning::AlreadyPresent(existing.id));
        }
        let role = self
            .roles
            .find_by_name(ADMIN_ROLE_NAME)
            .await
            .map_err(|err| map_store_error("role", err))?
            .ok_or_else(|| Error::internal(format!("role {ADMIN_ROLE_NAME} is missing")))?;
        let view = self
            .create(UserDraft {
                username,
                email,
                password,
                role_id: role.id,
            })
            .await?;
        Ok(AdminProvisioning::Created(view.user.id))
    }
}

#[async_trait]
impl<U, R, H> UserManagement for UserService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    async fn list(&self, page: Option<i64>) -> Result<Page<UserView>, Error> {
        self.users
            .list_page(Listing::Users.page(page))
            .await
            .map_err(map_user_error)
    }

    async fn get(&self, id: UserId) -> Result<UserView, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| not_found(ENTITY, id))
    }

    async fn create(&self, draft: UserDraft) -> Result<UserView, Error> {
        self.ensure_role(draft.role_id).await?;
        let password_hash = self
            .hasher
            .hash(&draft.password)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = self
            .users
            .create(&NewUser {
                username: draft.username,
                email: draft.email,
                password_hash,
                role_id: draft.role_id,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, role_id = %user.role_id, "user created");
        self.view_of(user).await
    }

    async fn update(&self, edit: UserEdit) -> Result<UserView, Error> {
        let current = self.get(edit.id).await?;
        let expected = expected_revision(ENTITY, edit.expected_revision, current.user.revision)?;
        self.ensure_role(edit.role_id).await?;
        let password_hash = match edit.password {
            Some(password) => Some(
                self.hasher
                    .hash(&password)
                    .await
                    .map_err(|err| Error::internal(err.to_string()))?,
            ),
            None => None,
        };
        let user = self
            .users
            .update(&UserChanges {
                id: edit.id,
                username: edit.username,
                email: edit.email,
                password_hash,
                role_id: edit.role_id,
                expected_revision: expected,
            })
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| not_found(ENTITY, edit.id))?;
        self.view_of(user).await
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let orphaned = self
            .users
            .delete(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| not_found(ENTITY, id))?;
        match &self.photos {
            Some(photos) => discard_photos(photos.as_ref(), &orphaned).await,
            None if !orphaned.is_empty() => {
                warn!(
                    user_id = %id,
                    photos = ?orphaned,
                    "recipe photos left without storage to remove them"
                );
            }
            None => {}
        }
        info!(user_id = %id, "user deleted with their recipes");
        Ok(())
    }
}
