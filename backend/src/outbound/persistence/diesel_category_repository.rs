//! PostgreSQL-backed `CategoryRepository`.
//!
//! Deleting a category removes its recipes first, in the same transaction,
//! so their photo paths can be handed back to the caller.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CategoryRepository, EntityStoreError};
use crate::domain::{Category, CategoryId, CategoryName};

use super::diesel_helpers::{
    cast_revision_for_db, disambiguate_update_failure, map_diesel_error, map_pool_error,
    next_revision, total_items, window_bound,
};
use super::models::{CategoryRow, CategoryUpdate, NewCategoryRow};
use super::pool::DbPool;
use super::schema::{categories, recipes};

/// Diesel-backed implementation of the `CategoryRepository` port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Category>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = categories::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::id.desc())
            .offset(window_bound(request.offset()))
            .limit(window_bound(request.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(request, items, total_items(count)))
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        categories::table
            .filter(categories::id.eq(id.get()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Category::try_from)
            .transpose()
    }

    async fn create(&self, name: &CategoryName) -> Result<Category, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                name: name.as_ref(),
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Category::try_from(row)
    }

    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
        expected_revision: u32,
    ) -> Result<Option<Category>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<CategoryRow> = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::revision.eq(cast_revision_for_db(expected_revision))),
        )
        .set(&CategoryUpdate {
            name: name.as_ref(),
            revision: next_revision(expected_revision),
        })
        .returning(CategoryRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return Category::try_from(row).map(Some);
        }
        let current: Option<i32> = categories::table
            .filter(categories::id.eq(id.get()))
            .select(categories::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        disambiguate_update_failure(current, expected_revision)
    }

    async fn delete(&self, id: CategoryId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let photos: Vec<Option<String>> =
                    diesel::delete(recipes::table.filter(recipes::category_id.eq(id.get())))
                        .returning(recipes::photo_path)
                        .get_results(conn)
                        .await?;
                let deleted =
                    diesel::delete(categories::table.filter(categories::id.eq(id.get())))
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
