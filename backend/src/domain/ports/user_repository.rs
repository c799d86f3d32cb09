//! Port for user account persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewUser, User, UserChanges, UserId, UserView};

use super::EntityStoreError;

/// Storage for user accounts.
///
/// Emails are unique ([`super::USERS_EMAIL_KEY`]) and compared exactly.
/// Deleting a user cascades to the recipes they authored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One page of users with their role names, newest id first.
    async fn list_page(&self, request: PageRequest) -> Result<Page<UserView>, EntityStoreError>;

    /// Fetch a user with its role name.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserView>, EntityStoreError>;

    /// Fetch the account owning `email` (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, EntityStoreError>;

    /// Insert a user at revision 1.
    async fn create(&self, user: &NewUser) -> Result<User, EntityStoreError>;

    /// Replace a user's fields if its revision still matches.
    ///
    /// Returns `Ok(None)` when the user no longer exists.
    async fn update(&self, changes: &UserChanges) -> Result<Option<User>, EntityStoreError>;

    /// Delete a user and the recipes they authored.
    ///
    /// Returns `None` when no such user existed, otherwise the stored photo
    /// paths of the recipes removed with them.
    async fn delete(&self, id: UserId) -> Result<Option<Vec<String>>, EntityStoreError>;
}
