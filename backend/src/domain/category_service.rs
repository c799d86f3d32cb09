//! Category administration.
//!
//! Deleting a category removes its recipes too, along with their stored
//! photos.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use tracing::info;

use super::photo_cleanup::discard_photos;
use super::ports::{CategoryEdit, CategoryManagement, CategoryRepository, PhotoStorage};
use super::store_errors::{expected_revision, map_store_error, not_found};
use super::{Category, CategoryId, CategoryName, Error, Listing};

const ENTITY: &str = "category";

/// Category use-cases over a [`CategoryRepository`].
#[derive(Clone)]
pub struct CategoryService<C, P> {
    repo: Arc<C>,
    photos: Arc<P>,
}

impl<C, P> CategoryService<C, P> {
    /// Create a new service over `repo`, discarding cascaded photos in
    /// `photos`.
    pub fn new(repo: Arc<C>, photos: Arc<P>) -> Self {
        Self { repo, photos }
    }
}

#[async_trait]
impl<C, P> CategoryManagement for CategoryService<C, P>
where
    C: CategoryRepository,
    P: PhotoStorage,
{
    async fn list(&self, page: Option<i64>) -> Result<Page<Category>, Error> {
        self.repo
            .list_page(Listing::Categories.page(page))
            .await
            .map_err(|err| map_store_error(ENTITY, err))
    }

    async fn get(&self, id: CategoryId) -> Result<Category, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?
            .ok_or_else(|| not_found(ENTITY, id))
    }

    async fn create(&self, name: CategoryName) -> Result<Category, Error> {
        let category = self
            .repo
            .create(&name)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?;
        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    async fn update(&self, edit: CategoryEdit) -> Result<Category, Error> {
        let current = self.get(edit.id).await?;
        let expected = expected_revision(ENTITY, edit.expected_revision, current.revision)?;
        self.repo
            .update(edit.id, &edit.name, expected)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?
            .ok_or_else(|| not_found(ENTITY, edit.id))
    }

    async fn delete(&self, id: CategoryId) -> Result<(), Error> {
        let orphaned = self
            .repo
            .delete(id)
            .await
            .map_err(|err| map_store_error(ENTITY, err))?
            .ok_or_else(|| not_found(ENTITY, id))?;
        discard_photos(&*self.photos, &orphaned).await;
        info!(
            category_id = %id,
            recipe_photos = orphaned.len(),
            "category deleted with its recipes"
        );
        Ok(())
    }
}
