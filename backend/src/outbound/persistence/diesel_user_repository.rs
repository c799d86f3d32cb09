//! PostgreSQL-backed `UserRepository`.
//!
//! Reads that return a [`UserView`] join `roles` so the role name arrives in
//! the same round trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{Page, PageRequest};

use crate::domain::ports::{EntityStoreError, UserRepository};
use crate::domain::{NewUser, RoleName, User, UserChanges, UserId, UserView};

use super::diesel_helpers::{
    cast_revision_for_db, disambiguate_update_failure, map_diesel_error, map_pool_error,
    next_revision, total_items, window_bound,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::{recipes, roles, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn user_view((row, role_name): (UserRow, String)) -> Result<UserView, EntityStoreError> {
    let role_name = RoleName::new(&role_name).map_err(|_| {
        EntityStoreError::query(format!("role of user {} has an invalid name", row.id))
    })?;
    Ok(UserView {
        user: User::try_from(row)?,
        role_name,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list_page(&self, request: PageRequest) -> Result<Page<UserView>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<(UserRow, String)> = users::table
            .inner_join(roles::table)
            .select((UserRow::as_select(), roles::name))
            .order_by(users::id.desc())
            .offset(window_bound(request.offset()))
            .limit(window_bound(request.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(user_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(request, items, total_items(count)))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserView>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .inner_join(roles::table)
            .filter(users::id.eq(id.get()))
            .select((UserRow::as_select(), roles::name))
            .first::<(UserRow, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(user_view)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                username: user.username.as_ref(),
                email: user.email.as_ref(),
                password_hash: user.password_hash.as_ref(),
                role_id: user.role_id.get(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        User::try_from(row)
    }

    async fn update(&self, changes: &UserChanges) -> Result<Option<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<UserRow> = diesel::update(
            users::table
                .filter(users::id.eq(changes.id.get()))
                .filter(users::revision.eq(cast_revision_for_db(changes.expected_revision))),
        )
        .set(&UserUpdate {
            username: changes.username.as_ref(),
            email: changes.email.as_ref(),
            password_hash: changes.password_hash.as_ref().map(AsRef::as_ref),
            role_id: changes.role_id.get(),
            revision: next_revision(changes.expected_revision),
        })
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return User::try_from(row).map(Some);
        }
        let current: Option<i32> = users::table
            .filter(users::id.eq(changes.id.get()))
            .select(users::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        disambiguate_update_failure(current, changes.expected_revision)
    }

    async fn delete(&self, id: UserId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Authored recipes go first so their photo paths survive the cascade.
        conn.transaction(|conn| {
            async move {
                let photos: Vec<Option<String>> =
                    diesel::delete(recipes::table.filter(recipes::user_id.eq(id.get())))
                        .returning(recipes::photo_path)
                        .get_results(conn)
                        .await?;
                let deleted = diesel::delete(users::table.filter(users::id.eq(id.get())))
                    .execute(conn)
                    .await?;
                Ok((deleted > 0).then(|| photos.into_iter().flatten().collect()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
