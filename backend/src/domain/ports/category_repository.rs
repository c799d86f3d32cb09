//! Port for category persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Category, CategoryId, CategoryName};

use super::EntityStoreError;

/// Storage for categories. Deleting a category cascades to its recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// One page of categories, newest id first.
    async fn list_page(&self, request: PageRequest) -> Result<Page<Category>, EntityStoreError>;

    /// Fetch a category by id.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, EntityStoreError>;

    /// Insert a category at revision 1.
    async fn create(&self, name: &CategoryName) -> Result<Category, EntityStoreError>;

    /// Rename a category if its revision still equals `expected_revision`.
    ///
    /// Returns `Ok(None)` when the category no longer exists.
    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
        expected_revision: u32,
    ) -> Result<Option<Category>, EntityStoreError>;

    /// Delete a category and its recipes.
    ///
    /// Returns `None` when no such category existed, otherwise the stored
    /// photo paths of the recipes removed with it.
    async fn delete(&self, id: CategoryId) -> Result<Option<Vec<String>>, EntityStoreError>;
}
