//! In-process entity store.
//!
//! Implements every repository port over one mutex-guarded state so the
//! service can run without PostgreSQL in development and in integration
//! tests. Uniqueness, foreign keys, cascades and revision checks follow the
//! database schema in `backend/migrations`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{Page, PageRequest, paginate};

use crate::domain::ports::{
    CategoryRepository, EntityStoreError, RECIPES_CATEGORY_FKEY, RECIPES_USER_FKEY,
    ROLES_NAME_KEY, RecipeRepository, RoleRepository, USERS_EMAIL_KEY, USERS_ROLE_FKEY,
    UserRepository,
};
use crate::domain::{
    ADMIN_ROLE_NAME, Category, CategoryId, CategoryName, DEFAULT_ROLE_NAME, NewRecipe, NewUser,
    Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeView, Role, RoleId, RoleName, User,
    UserChanges, UserId, UserView,
};

/// Rows of one table keyed by serial id.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id = self.last_id.saturating_add(1);
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    /// Rows, newest id first.
    fn newest_first(&self) -> impl Iterator<Item = &T> {
        self.rows.values().rev()
    }
}

/// Apply a revision-checked write to `row`.
///
/// Returns `Ok(None)` when the row is gone, mirroring a zero-row `UPDATE`.
fn checked_update<T: Clone>(
    row: Option<&mut T>,
    revision: impl Fn(&T) -> u32,
    expected: u32,
    apply: impl FnOnce(&mut T, u32),
) -> Result<Option<T>, EntityStoreError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let actual = revision(row);
    if actual != expected {
        return Err(EntityStoreError::revision_mismatch(expected, actual));
    }
    apply(row, expected.saturating_add(1));
    Ok(Some(row.clone()))
}

#[derive(Debug, Default)]
struct State {
    roles: Table<Role>,
    users: Table<User>,
    categories: Table<Category>,
    recipes: Table<Recipe>,
}

impl State {
    fn user_view(&self, user: &User) -> Result<UserView, EntityStoreError> {
        let role = self
            .roles
            .rows
            .get(&user.role_id.get())
            .ok_or_else(|| EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY))?;
        Ok(UserView {
            user: user.clone(),
            role_name: role.name.clone(),
        })
    }

    fn recipe_view(&self, recipe: &Recipe) -> Result<RecipeView, EntityStoreError> {
        let category = self
            .categories
            .rows
            .get(&recipe.details.category_id.get())
            .ok_or_else(|| EntityStoreError::foreign_key_violation(RECIPES_CATEGORY_FKEY))?;
        let author = self
            .users
            .rows
            .get(&recipe.author_id.get())
            .ok_or_else(|| EntityStoreError::foreign_key_violation(RECIPES_USER_FKEY))?;
        Ok(RecipeView {
            recipe: recipe.clone(),
            category_name: category.name.as_ref().to_owned(),
            author_name: author.username.as_ref().to_owned(),
        })
    }

    /// Remove every recipe matching `doomed`, returning their photo paths.
    fn drop_recipes(&mut self, doomed: impl Fn(&Recipe) -> bool) -> Vec<String> {
        let mut photos = Vec::new();
        self.recipes.rows.retain(|_, recipe| {
            if !doomed(recipe) {
                return true;
            }
            photos.extend(recipe.photo_path.clone());
            false
        });
        photos
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .rows
            .values()
            .any(|user| user.email.as_ref() == email && Some(user.id) != except)
    }

    fn ensure_recipe_references(&self, recipe: &Recipe) -> Result<(), EntityStoreError> {
        if !self
            .categories
            .rows
            .contains_key(&recipe.details.category_id.get())
        {
            return Err(EntityStoreError::foreign_key_violation(
                RECIPES_CATEGORY_FKEY,
            ));
        }
        if !self.users.rows.contains_key(&recipe.author_id.get()) {
            return Err(EntityStoreError::foreign_key_violation(RECIPES_USER_FKEY));
        }
        Ok(())
    }
}

/// Entity store held in process memory.
///
/// # Examples
/// ```
/// use culinaria::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::with_reference_roles();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the `Administrador` and `Usuario` roles,
    /// matching the database migration.
    pub fn with_reference_roles() -> Self {
        let mut state = State::default();
        for name in [ADMIN_ROLE_NAME, DEFAULT_ROLE_NAME] {
            if let Ok(role_name) = RoleName::new(name) {
                state.roles.insert_with(|id| Role {
                    id: RoleId::new(id),
                    name: role_name,
                    revision: 1,
                });
            }
        }
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, EntityStoreError> {
        self.state
            .lock()
            .map_err(|_| EntityStoreError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Role>, EntityStoreError> {
        let state = self.lock()?;
        Ok(state.roles.newest_first().cloned().collect())
    }

    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, EntityStoreError> {
        let state = self.lock()?;
        Ok(state.roles.rows.get(&id.get()).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, EntityStoreError> {
        let state = self.lock()?;
        Ok(state
            .roles
            .rows
            .values()
            .find(|role| role.name.as_ref() == name)
            .cloned())
    }

    async fn create(&self, name: &RoleName) -> Result<Role, EntityStoreError> {
        let mut state = self.lock()?;
        if state.roles.rows.values().any(|role| role.name == *name) {
            return Err(EntityStoreError::unique_violation(ROLES_NAME_KEY));
        }
        Ok(state.roles.insert_with(|id| Role {
            id: RoleId::new(id),
            name: name.clone(),
            revision: 1,
        }))
    }

    async fn update(
        &self,
        id: RoleId,
        name: &RoleName,
        expected_revision: u32,
    ) -> Result<Option<Role>, EntityStoreError> {
        let mut state = self.lock()?;
        if state
            .roles
            .rows
            .values()
            .any(|role| role.name == *name && role.id != id)
        {
            return Err(EntityStoreError::unique_violation(ROLES_NAME_KEY));
        }
        checked_update(
            state.roles.rows.get_mut(&id.get()),
            |role| role.revision,
            expected_revision,
            |role, revision| {
                role.name = name.clone();
                role.revision = revision;
            },
        )
    }

    async fn delete(&self, id: RoleId) -> Result<bool, EntityStoreError> {
        let mut state = self.lock()?;
        if state.users.rows.values().any(|user| user.role_id == id) {
            return Err(EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY));
        }
        Ok(state.roles.rows.remove(&id.get()).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_page(&self, request: PageRequest) -> Result<Page<UserView>, EntityStoreError> {
        let state = self.lock()?;
        let views = state
            .users
            .newest_first()
            .map(|user| state.user_view(user))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(&views, request))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserView>, EntityStoreError> {
        let state = self.lock()?;
        state
            .users
            .rows
            .get(&id.get())
            .map(|user| state.user_view(user))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, EntityStoreError> {
        let state = self.lock()?;
        Ok(state
            .users
            .rows
            .values()
            .find(|user| user.email.as_ref() == email)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, EntityStoreError> {
        let mut state = self.lock()?;
        if state.email_taken(user.email.as_ref(), None) {
            return Err(EntityStoreError::unique_violation(USERS_EMAIL_KEY));
        }
        if !state.roles.rows.contains_key(&user.role_id.get()) {
            return Err(EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY));
        }
        Ok(state.users.insert_with(|id| User {
            id: UserId::new(id),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role_id: user.role_id,
            revision: 1,
        }))
    }

    async fn update(&self, changes: &UserChanges) -> Result<Option<User>, EntityStoreError> {
        let mut state = self.lock()?;
        if state.email_taken(changes.email.as_ref(), Some(changes.id)) {
            return Err(EntityStoreError::unique_violation(USERS_EMAIL_KEY));
        }
        if !state.roles.rows.contains_key(&changes.role_id.get()) {
            return Err(EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY));
        }
        checked_update(
            state.users.rows.get_mut(&changes.id.get()),
            |user| user.revision,
            changes.expected_revision,
            |user, revision| {
                user.username = changes.username.clone();
                user.email = changes.email.clone();
                if let Some(hash) = &changes.password_hash {
                    user.password_hash = hash.clone();
                }
                user.role_id = changes.role_id;
                user.revision = revision;
            },
        )
    }

    async fn delete(&self, id: UserId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut state = self.lock()?;
        if state.users.rows.remove(&id.get()).is_none() {
            return Ok(None);
        }
        Ok(Some(state.drop_recipes(|recipe| recipe.author_id == id)))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Category>, EntityStoreError> {
        let state = self.lock()?;
        let rows: Vec<Category> = state.categories.newest_first().cloned().collect();
        Ok(paginate(&rows, request))
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, EntityStoreError> {
        let state = self.lock()?;
        Ok(state.categories.rows.get(&id.get()).cloned())
    }

    async fn create(&self, name: &CategoryName) -> Result<Category, EntityStoreError> {
        let mut state = self.lock()?;
        Ok(state.categories.insert_with(|id| Category {
            id: CategoryId::new(id),
            name: name.clone(),
            revision: 1,
        }))
    }

    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
        expected_revision: u32,
    ) -> Result<Option<Category>, EntityStoreError> {
        let mut state = self.lock()?;
        checked_update(
            state.categories.rows.get_mut(&id.get()),
            |category| category.revision,
            expected_revision,
            |category, revision| {
                category.name = name.clone();
                category.revision = revision;
            },
        )
    }

    async fn delete(&self, id: CategoryId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut state = self.lock()?;
        if state.categories.rows.remove(&id.get()).is_none() {
            return Ok(None);
        }
        Ok(Some(
            state.drop_recipes(|recipe| recipe.details.category_id == id),
        ))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list_page(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<RecipeView>, EntityStoreError> {
        let state = self.lock()?;
        let views = state
            .recipes
            .newest_first()
            .filter(|recipe| filter.matches(recipe))
            .map(|recipe| state.recipe_view(recipe))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(&views, request))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeView>, EntityStoreError> {
        let state = self.lock()?;
        state
            .recipes
            .rows
            .get(&id.get())
            .map(|recipe| state.recipe_view(recipe))
            .transpose()
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, EntityStoreError> {
        let mut state = self.lock()?;
        let candidate = Recipe {
            id: RecipeId::new(0),
            details: recipe.details.clone(),
            photo_path: recipe.photo_path.clone(),
            author_id: recipe.author_id,
            revision: 1,
        };
        state.ensure_recipe_references(&candidate)?;
        Ok(state.recipes.insert_with(|id| Recipe {
            id: RecipeId::new(id),
            ..candidate
        }))
    }

    async fn update(&self, changes: &RecipeChanges) -> Result<Option<Recipe>, EntityStoreError> {
        let mut state = self.lock()?;
        if !state
            .categories
            .rows
            .contains_key(&changes.details.category_id.get())
        {
            return Err(EntityStoreError::foreign_key_violation(
                RECIPES_CATEGORY_FKEY,
            ));
        }
        checked_update(
            state.recipes.rows.get_mut(&changes.id.get()),
            |recipe| recipe.revision,
            changes.expected_revision,
            |recipe, revision| {
                recipe.details = changes.details.clone();
                recipe.photo_path = changes.photo_path.clone();
                recipe.revision = revision;
            },
        )
    }

    async fn delete(&self, id: RecipeId) -> Result<Option<Vec<String>>, EntityStoreError> {
        let mut state = self.lock()?;
        Ok(state
            .recipes
            .rows
            .remove(&id.get())
            .map(|recipe| recipe.photo_path.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests;
