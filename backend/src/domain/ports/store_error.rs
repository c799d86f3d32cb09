//! Failure vocabulary shared by every entity repository.

use super::define_port_error;

define_port_error! {
    /// Errors raised by entity repository adapters.
    pub enum EntityStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "entity store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "entity store query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// A unique constraint rejected the write.
        UniqueViolation { constraint: String } =>
            "unique constraint {constraint} violated",
        /// A foreign key rejected the write or delete.
        ForeignKeyViolation { constraint: String } =>
            "foreign key {constraint} violated",
    }
}

/// Constraint protecting `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";
/// Constraint protecting `roles.name`.
pub const ROLES_NAME_KEY: &str = "roles_name_key";
/// Foreign key from `users.role_id` to `roles.id`.
pub const USERS_ROLE_FKEY: &str = "users_role_id_fkey";
/// Foreign key from `recipes.category_id` to `categories.id`.
pub const RECIPES_CATEGORY_FKEY: &str = "recipes_category_id_fkey";
/// Foreign key from `recipes.user_id` to `users.id`.
pub const RECIPES_USER_FKEY: &str = "recipes_user_id_fkey";
