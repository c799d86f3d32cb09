//! PostgreSQL-backed `RoleRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EntityStoreError, RoleRepository};
use crate::domain::{Role, RoleId, RoleName};

use super::diesel_helpers::{
    cast_revision_for_db, disambiguate_update_failure, map_diesel_error, map_pool_error,
    next_revision,
};
use super::models::{NewRoleRow, RoleRow, RoleUpdate};
use super::pool::DbPool;
use super::schema::roles;

/// Diesel-backed implementation of the `RoleRepository` port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn list_all(&self) -> Result<Vec<Role>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoleRow> = roles::table
            .select(RoleRow::as_select())
            .order_by(roles::id.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(Role::try_from).collect()
    }

    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        roles::table
            .filter(roles::id.eq(id.get()))
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Role::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        roles::table
            .filter(roles::name.eq(name))
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Role::try_from)
            .transpose()
    }

    async fn create(&self, name: &RoleName) -> Result<Role, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(roles::table)
            .values(&NewRoleRow {
                name: name.as_ref(),
            })
            .returning(RoleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Role::try_from(row)
    }

    async fn update(
        &self,
        id: RoleId,
        name: &RoleName,
        expected_revision: u32,
    ) -> Result<Option<Role>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<RoleRow> = diesel::update(
            roles::table
                .filter(roles::id.eq(id.get()))
                .filter(roles::revision.eq(cast_revision_for_db(expected_revision))),
        )
        .set(&RoleUpdate {
            name: name.as_ref(),
            revision: next_revision(expected_revision),
        })
        .returning(RoleRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return Role::try_from(row).map(Some);
        }
        let current: Option<i32> = roles::table
            .filter(roles::id.eq(id.get()))
            .select(roles::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        disambiguate_update_failure(current, expected_revision)
    }

    async fn delete(&self, id: RoleId) -> Result<bool, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(roles::table.filter(roles::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
