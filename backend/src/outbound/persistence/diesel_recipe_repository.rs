//! PostgreSQL-backed `RecipeRepository`.
//!
//! Listing and detail reads join `categories` and `users` so the category
//! name and author username load with the recipe. The title search uses
//! `LIKE`, which is case-sensitive in PostgreSQL.

use async_trait::async_trait;
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{EntityStoreError, RecipeRepository};
use crate::domain::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeView};

use super::diesel_helpers::{
    cast_revision_for_db, count_for_db, disambiguate_update_failure, like_contains,
    map_diesel_error, map_pool_error, next_revision, total_items, window_bound,
};
use super::models::{NewRecipeRow, RecipeRow, RecipeUpdate, RecipeViewRow, recipe_view};
use super::pool::DbPool;
use super::schema::{categories, recipes, users};

type RecipeJoin = InnerJoin<InnerJoin<recipes::table, categories::table>, users::table>;
type FilteredRecipes<'a> = IntoBoxed<'a, RecipeJoin, Pg>;

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: &RecipeFilter) -> FilteredRecipes<'static> {
    let mut query = recipes::table
        .inner_join(categories::table)
        .inner_join(users::table)
        .into_boxed::<Pg>();
    if let Some(category_id) = filter.category_id {
        query = query.filter(recipes::category_id.eq(category_id.get()));
    }
    if let Some(search) = filter.search.as_deref() {
        query = query.filter(recipes::title.like(like_contains(search)));
    }
    query
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list_page(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<RecipeView>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeViewRow> = filtered(filter)
            .select((RecipeRow::as_select(), categories::name, users::username))
            .order_by(recipes::id.desc())
            .offset(window_bound(request.offset()))
            .limit(window_bound(request.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(recipe_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(request, items, total_items(count)))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeView>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        recipes::table
            .inner_join(categories::table)
            .inner_join(users::table)
            .filter(recipes::id.eq(id.get()))
            .select((RecipeRow::as_select(), categories::name, users::username))
            .first::<RecipeViewRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(recipe_view)
            .transpose()
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, EntityStoreError> {
        let details = &recipe.details;
        let row = NewRecipeRow {
            title: &details.title,
            description: &details.description,
            ingredients: &details.ingredients,
            instructions: &details.instructions,
            prep_time_minutes: count_for_db(details.prep_time_minutes, "preparation time")?,
            servings: count_for_db(details.servings, "servings")?,
            photo_path: recipe.photo_path.as_deref(),
            category_id: details.category_id.get(),
            user_id: recipe.author_id.get(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(recipes::table)
            .values(&row)
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Recipe::try_from(inserted)
    }

    async fn update(&self, changes: &RecipeChanges) -> Result<Option<Recipe>, EntityStoreError> {
        let details = &changes.details;
        let changeset = RecipeUpdate {
            title: &details.title,
            description: &details.description,
            ingredients: &details.ingredients,
            instructions: &details.instructions,
            prep_time_minutes: count_for_db(details.prep_time_minutes, "preparation time")?,
            servings: count_for_db(details.servings, "servings")?,
            photo_path: changes.photo_path.as_deref(),
            category_id: details.category_id.get(),
            revision: next_revision(changes.expected_revision),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<RecipeRow> = diesel::update(
            recipes::table
                .filter(recipes::id.eq(changes.id.get()))
                .filter(recipes::revision.eq(cast_revision_for_db(changes.expected_revision))),
        )
        .set(&changeset)
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return Recipe::try_from(row).map(Some);
        }
        let current: Option<i32> = recipes::table
            .filter(recipes::id.eq(changes.id.get()))
            .select(recipes::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        disambiguate_update_failure(current, changes.expected_revision)
    }

    async fn delete(&self, id: RecipeId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted: Option<Option<String>> =
            diesel::delete(recipes::table.filter(recipes::id.eq(id.get())))
                .returning(recipes::photo_path)
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        Ok(deleted.map(|photo| photo.into_iter().collect()))
    }
}
