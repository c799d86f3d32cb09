//! Role administration.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{EntityStoreError, RoleEdit, RoleManagement, RoleRepository};
use super::store_errors::{expected_revision, map_store_error, not_found};
use super::{Error, Role, RoleId, RoleName};

const ENTITY: &str = "role";

fn map_role_error(error: EntityStoreError) -> Error {
    match error {
        EntityStoreError::UniqueViolation { .. } => {
            Error::conflict("a role with this name already exists")
                .with_details(json!({ "field": "name", "code": "duplicate_role_name" }))
        }
        EntityStoreError::ForeignKeyViolation { .. } => {
            Error::conflict("role is still assigned to users")
                .with_details(json!({ "code": "role_in_use" }))
        }
        other => map_store_error(ENTITY, other),
    }
}

/// Role use-cases over a [`RoleRepository`].
#[derive(Clone)]
pub struct RoleService<R> {
    repo: Arc<R>,
}

impl<R> RoleService<R> {
    /// Create a new service over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> RoleManagement for RoleService<R>
where
    R: RoleRepository,
{
    async fn list(&self) -> Result<Vec<Role>, Error> {
        self.repo.list_all().await.map_err(map_role_error)
    }

    async fn get(&self, id: RoleId) -> Result<Role, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_role_error)?
            .ok_or_else(|| not_found(ENTITY, id))
    }

    async fn create(&self, name: RoleName) -> Result<Role, Error> {
        let role = self.repo.create(&name).await.map_err(map_role_error)?;
        info!(role_id = %role.id, role = %role.name, "role created");
        Ok(role)
    }

    async fn update(&self, edit: RoleEdit) -> Result<Role, Error> {
        let current = self.get(edit.id).await?;
        let expected = expected_revision(ENTITY, edit.expected_revision, current.revision)?;
        self.repo
            .update(edit.id, &edit.name, expected)
            .await
            .map_err(map_role_error)?
            .ok_or_else(|| not_found(ENTITY, edit.id))
    }

    async fn delete(&self, id: RoleId) -> Result<(), Error> {
        if !self.repo.delete(id).await.map_err(map_role_error)? {
            return Err(not_found(ENTITY, id));
        }
        info!(role_id = %id, "role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockRoleRepository, ROLES_NAME_KEY, USERS_ROLE_FKEY};

    fn service(repo: MockRoleRepository) -> RoleService<MockRoleRepository> {
        RoleService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn duplicate_names_are_conflicts() {
        let mut repo = MockRoleRepository::new();
        repo.expect_create()
            .return_once(|_| Err(EntityStoreError::unique_violation(ROLES_NAME_KEY)));

        let error = service(repo)
            .create(RoleName::new("Usuario").expect("name"))
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.details().expect("details")["code"], "duplicate_role_name");
    }

    #[tokio::test]
    async fn roles_held_by_users_cannot_be_deleted() {
        let mut repo = MockRoleRepository::new();
        repo.expect_delete()
            .return_once(|_| Err(EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY)));

        let error = service(repo)
            .delete(RoleId::new(2))
            .await
            .expect_err("in use");
        assert_eq!(error.details().expect("details")["code"], "role_in_use");
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let mut repo = MockRoleRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(true));
        repo.expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(false));
        let service = service(repo);

        service.delete(RoleId::new(3)).await.expect("first delete");
        let error = service
            .delete(RoleId::new(3))
            .await
            .expect_err("second delete");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
