//! Driving ports for entity administration.
//!
//! Every `update` carries the revision the caller last read; a write against
//! any other revision fails with `conflict`. Every `delete` of an unknown id
//! fails with `not_found`.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    Category, CategoryId, CategoryName, EmailAddress, Error, PhotoUpload, PlainPassword,
    RecipeDetails, RecipeFilter, RecipeId, RecipeView, Role, RoleId, RoleName, UserId, UserView,
    Username,
};

/// Rename request for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEdit {
    pub id: CategoryId,
    pub name: CategoryName,
    pub expected_revision: u32,
}

/// Category use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryManagement: Send + Sync {
    /// Page `page` (1-based, forgiving) of categories.
    async fn list(&self, page: Option<i64>) -> Result<Page<Category>, Error>;
    /// One category.
    async fn get(&self, id: CategoryId) -> Result<Category, Error>;
    /// Create a category.
    async fn create(&self, name: CategoryName) -> Result<Category, Error>;
    /// Rename a category.
    async fn update(&self, edit: CategoryEdit) -> Result<Category, Error>;
    /// Delete a category and every recipe in it.
    async fn delete(&self, id: CategoryId) -> Result<(), Error>;
}

/// New recipe submitted by an authenticated author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub details: RecipeDetails,
    pub photo: Option<PhotoUpload>,
    pub author_id: UserId,
}

/// Edit of an existing recipe. Without a new photo the stored one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeEdit {
    pub id: RecipeId,
    pub details: RecipeDetails,
    pub photo: Option<PhotoUpload>,
    pub expected_revision: u32,
}

/// Recipe use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeManagement: Send + Sync {
    /// Page `page` of recipes passing `filter`.
    async fn list(
        &self,
        filter: RecipeFilter,
        page: Option<i64>,
    ) -> Result<Page<RecipeView>, Error>;
    /// One recipe.
    async fn get(&self, id: RecipeId) -> Result<RecipeView, Error>;
    /// Create a recipe, storing its photo first if one was uploaded.
    async fn create(&self, draft: RecipeDraft) -> Result<RecipeView, Error>;
    /// Replace a recipe's content.
    async fn update(&self, edit: RecipeEdit) -> Result<RecipeView, Error>;
    /// Delete a recipe.
    async fn delete(&self, id: RecipeId) -> Result<(), Error>;
}

/// Rename request for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEdit {
    pub id: RoleId,
    pub name: RoleName,
    pub expected_revision: u32,
}

/// Role use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleManagement: Send + Sync {
    /// Every role, newest first.
    async fn list(&self) -> Result<Vec<Role>, Error>;
    /// One role.
    async fn get(&self, id: RoleId) -> Result<Role, Error>;
    /// Create a role with a unique name.
    async fn create(&self, name: RoleName) -> Result<Role, Error>;
    /// Rename a role.
    async fn update(&self, edit: RoleEdit) -> Result<Role, Error>;
    /// Delete a role no user holds.
    async fn delete(&self, id: RoleId) -> Result<(), Error>;
}

/// Account created by an administrator with an explicit role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: Username,
    pub email: EmailAddress,
    pub password: PlainPassword,
    pub role_id: RoleId,
}

/// Edit of an account. Without a password the stored hash is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEdit {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password: Option<PlainPassword>,
    pub role_id: RoleId,
    pub expected_revision: u32,
}

/// User account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserManagement: Send + Sync {
    /// Page `page` of accounts.
    async fn list(&self, page: Option<i64>) -> Result<Page<UserView>, Error>;
    /// One account.
    async fn get(&self, id: UserId) -> Result<UserView, Error>;
    /// Create an account.
    async fn create(&self, draft: UserDraft) -> Result<UserView, Error>;
    /// Replace an account's fields.
    async fn update(&self, edit: UserEdit) -> Result<UserView, Error>;
    /// Delete an account and the recipes it authored.
    async fn delete(&self, id: UserId) -> Result<(), Error>;
}
