//! Port for role persistence.

use async_trait::async_trait;

use crate::domain::{Role, RoleId, RoleName};

use super::EntityStoreError;

/// Storage for roles.
///
/// Names are unique ([`super::ROLES_NAME_KEY`]); deleting a role that users
/// still reference fails with
/// [`EntityStoreError::ForeignKeyViolation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Every role, newest id first.
    async fn list_all(&self) -> Result<Vec<Role>, EntityStoreError>;

    /// Fetch a role by id.
    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, EntityStoreError>;

    /// Fetch a role by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, EntityStoreError>;

    /// Insert a role at revision 1.
    async fn create(&self, name: &RoleName) -> Result<Role, EntityStoreError>;

    /// Rename a role if its revision still equals `expected_revision`.
    ///
    /// Returns `Ok(None)` when the role no longer exists.
    async fn update(
        &self,
        id: RoleId,
        name: &RoleName,
        expected_revision: u32,
    ) -> Result<Option<Role>, EntityStoreError>;

    /// Delete a role. Returns `false` when no such role existed.
    async fn delete(&self, id: RoleId) -> Result<bool, EntityStoreError>;
}
