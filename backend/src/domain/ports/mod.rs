//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `RegistrationService`, the `*Management`
//! traits) are called by inbound adapters. Driven ports (repositories,
//! `PasswordHasher`, `PhotoStorage`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod category_repository;
mod login_service;
mod management;
mod password_hasher;
mod photo_storage;
mod recipe_repository;
mod registration;
mod role_repository;
mod store_error;
mod user_repository;

pub use category_repository::CategoryRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use login_service::{AuthenticatedUser, LoginService};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use management::{
    CategoryEdit, CategoryManagement, RecipeDraft, RecipeEdit, RecipeManagement, RoleEdit,
    RoleManagement, UserDraft, UserEdit, UserManagement,
};
#[cfg(test)]
pub use management::{
    MockCategoryManagement, MockRecipeManagement, MockRoleManagement, MockUserManagement,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use photo_storage::MockPhotoStorage;
pub use photo_storage::{PhotoStorage, PhotoStorageError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::RecipeRepository;
#[cfg(test)]
pub use registration::MockRegistrationService;
pub use registration::RegistrationService;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::RoleRepository;
pub use store_error::{
    EntityStoreError, RECIPES_CATEGORY_FKEY, RECIPES_USER_FKEY, ROLES_NAME_KEY,
    USERS_EMAIL_KEY, USERS_ROLE_FKEY,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
