//! Port for recipe persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeView};

use super::EntityStoreError;

/// Storage for recipes.
///
/// Reads always return the category name and author username alongside the
/// recipe so listings need a single round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// One page of recipes matching `filter`, newest id first.
    async fn list_page(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<RecipeView>, EntityStoreError>;

    /// Fetch a recipe by id.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeView>, EntityStoreError>;

    /// Insert a recipe at revision 1.
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, EntityStoreError>;

    /// Replace a recipe's content if its revision still matches.
    ///
    /// Returns `Ok(None)` when the recipe no longer exists.
    async fn update(&self, changes: &RecipeChanges) -> Result<Option<Recipe>, EntityStoreError>;

    /// Delete a recipe.
    ///
    /// Returns `None` when no such recipe existed, otherwise the stored photo
    /// path it referenced, if any.
    async fn delete(&self, id: RecipeId) -> Result<Option<Vec<String>>, EntityStoreError>;
}
