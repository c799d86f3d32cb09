//! Recipe publishing, editing and browsing.
//!
//! Photos are written to storage before the row that references them. When
//! the row write fails the freshly stored photo is removed again on a
//! best-effort basis; a failed removal is logged and otherwise ignored. The
//! same applies to the photo of a deleted recipe.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::info;

use super::ports::{
    CategoryRepository, EntityStoreError, PhotoStorage, PhotoStorageError,
    RECIPES_CATEGORY_FKEY, RecipeDraft, RecipeEdit, RecipeManagement, RecipeRepository,
};
use super::photo_cleanup::discard_photos;
use super::store_errors::{expected_revision, map_store_error, not_found};
use super::{
    CategoryId, Error, Listing, NewRecipe, PhotoUpload, RecipeChanges, RecipeFilter, RecipeId,
    RecipeView,
};

const ENTITY: &str = "recipe";

fn unknown_category(category_id: CategoryId) -> Error {
    Error::invalid_request(format!("category {category_id} does not exist"))
        .with_details(json!({ "field": "categoryId", "code": "unknown_category" }))
}

fn map_recipe_error(error: EntityStoreError, category_id: CategoryId) -> Error {
    match error {
        EntityStoreError::ForeignKeyViolation { constraint }
            if constraint == RECIPES_CATEGORY_FKEY =>
        {
            unknown_category(category_id)
        }
        other => map_store_error(ENTITY, other),
    }
}

fn map_storage_error(error: PhotoStorageError) -> Error {
    Error::service_unavailable(format!("photo could not be stored: {error}"))
}

/// Recipe use-cases over recipe, category and photo storage.
#[derive(Clone)]
pub struct RecipeService<R, C, P> {
    recipes: Arc<R>,
    categories: Arc<C>,
    photos: Arc<P>,
}

impl<R, C, P> RecipeService<R, C, P>
where
    R: RecipeRepository,
    C: CategoryRepository,
    P: PhotoStorage,
{
    /// Create a new service over the given ports.
    pub fn new(recipes: Arc<R>, categories: Arc<C>, photos: Arc<P>) -> Self {
        Self {
            recipes,
            categories,
            photos,
        }
    }

    async fn ensure_category(&self, category_id: CategoryId) -> Result<(), Error> {
        self.categories
            .find_by_id(category_id)
            .await
            .map_err(|err| map_store_error("category", err))?
            .map(|_| ())
            .ok_or_else(|| unknown_category(category_id))
    }

    async fn store_photo(&self, photo: Option<&PhotoUpload>) -> Result<Option<String>, Error> {
        match photo {
            Some(upload) => {
                let path = self.photos.store(upload).await.map_err(map_storage_error)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    async fn discard_photo(&self, stored: Option<&str>) {
        if let Some(path) = stored {
            discard_photos(&*self.photos, &[path.to_owned()]).await;
        }
    }

    async fn view(&self, id: RecipeId) -> Result<RecipeView, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?
            .ok_or_else(|| not_found(ENTITY, id))
    }
}

#[async_trait]
impl<R, C, P> RecipeManagement for RecipeService<R, C, P>
where
    R: RecipeRepository,
    C: CategoryRepository,
    P: PhotoStorage,
{
    async fn list(
        &self,
        filter: RecipeFilter,
        page: Option<i64>,
    ) -> Result<Page<RecipeView>, Error> {
        self.recipes
            .list_page(&filter, Listing::Recipes.page(page))
            .await
            .map_err(|err| map_store_error(ENTITY, err))
    }

    async fn get(&self, id: RecipeId) -> Result<RecipeView, Error> {
        self.view(id).await
    }

    async fn create(&self, draft: RecipeDraft) -> Result<RecipeView, Error> {
        let category_id = draft.details.category_id;
        self.ensure_category(category_id).await?;
        let photo_path = self.store_photo(draft.photo.as_ref()).await?;

        let created = self
            .recipes
            .create(&NewRecipe {
                details: draft.details,
                photo_path: photo_path.clone(),
                author_id: draft.author_id,
            })
            .await;
        let recipe = match created {
            Ok(recipe) => recipe,
            Err(err) => {
                self.discard_photo(photo_path.as_deref()).await;
                return Err(map_recipe_error(err, category_id));
            }
        };

        info!(recipe_id = %recipe.id, author_id = %recipe.author_id, "recipe published");
        self.view(recipe.id).await
    }

    async fn update(&self, edit: RecipeEdit) -> Result<RecipeView, Error> {
        let current = self.view(edit.id).await?;
        let expected =
            expected_revision(ENTITY, edit.expected_revision, current.recipe.revision)?;
        let category_id = edit.details.category_id;
        self.ensure_category(category_id).await?;

        let uploaded = self.store_photo(edit.photo.as_ref()).await?;
        let photo_path = uploaded
            .clone()
            .or_else(|| current.recipe.photo_path.clone());

        let updated = self
            .recipes
            .update(&RecipeChanges {
                id: edit.id,
                details: edit.details,
                photo_path,
                expected_revision: expected,
            })
            .await;
        match updated {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.discard_photo(uploaded.as_deref()).await;
                return Err(not_found(ENTITY, edit.id));
            }
            Err(err) => {
                self.discard_photo(uploaded.as_deref()).await;
                return Err(map_recipe_error(err, category_id));
            }
        }

        if uploaded.is_some() {
            // The replaced photo is no longer referenced.
            self.discard_photo(current.recipe.photo_path.as_deref()).await;
        }
        self.view(edit.id).await
    }

    async fn delete(&self, id: RecipeId) -> Result<(), Error> {
        let orphaned = self
            .recipes
            .delete(id)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?
            .ok_or_else(|| not_found(ENTITY, id))?;
        discard_photos(&*self.photos, &orphaned).await;
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }
}
