//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-validate
//! stored text so a hand-edited row surfaces as a query error rather than an
//! invalid entity.

use diesel::prelude::*;

use crate::domain::ports::EntityStoreError;
use crate::domain::{
    Category, CategoryId, CategoryName, EmailAddress, PasswordHash, Recipe, RecipeDetails,
    RecipeId, RecipeView, Role, RoleId, RoleName, User, UserId, Username,
};

use super::diesel_helpers::cast_revision;
use super::schema::{categories, recipes, roles, users};

fn corrupt(table: &str, id: i32, field: &str) -> EntityStoreError {
    EntityStoreError::query(format!("{table} row {id} holds an invalid {field}"))
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Row struct for reading from the roles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: i32,
    pub name: String,
    pub revision: i32,
}

impl TryFrom<RoleRow> for Role {
    type Error = EntityStoreError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoleId::new(row.id),
            name: RoleName::new(&row.name).map_err(|_| corrupt("roles", row.id, "name"))?,
            revision: cast_revision(row.revision),
        })
    }
}

/// Insertable struct for creating roles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub(crate) struct NewRoleRow<'a> {
    pub name: &'a str,
}

/// Changeset for renaming a role.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = roles)]
pub(crate) struct RoleUpdate<'a> {
    pub name: &'a str,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub revision: i32,
}

impl TryFrom<UserRow> for User {
    type Error = EntityStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            username: Username::new(&row.username)
                .map_err(|_| corrupt("users", row.id, "username"))?,
            email: EmailAddress::new(&row.email).map_err(|_| corrupt("users", row.id, "email"))?,
            password_hash: PasswordHash::new(row.password_hash),
            role_id: RoleId::new(row.role_id),
            revision: cast_revision(row.revision),
        })
    }
}

/// Insertable struct for creating users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role_id: i32,
}

/// Changeset for editing a user. A `None` hash leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub role_id: i32,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub revision: i32,
}

impl TryFrom<CategoryRow> for Category {
    type Error = EntityStoreError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(row.id),
            name: CategoryName::new(&row.name)
                .map_err(|_| corrupt("categories", row.id, "name"))?,
            revision: cast_revision(row.revision),
        })
    }
}

/// Insertable struct for creating categories.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
}

/// Changeset for renaming a category.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryUpdate<'a> {
    pub name: &'a str,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub photo_path: Option<String>,
    pub category_id: i32,
    pub user_id: i32,
    pub revision: i32,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = EntityStoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let prep_time_minutes = u32::try_from(row.prep_time_minutes)
            .map_err(|_| corrupt("recipes", row.id, "preparation time"))?;
        let servings =
            u32::try_from(row.servings).map_err(|_| corrupt("recipes", row.id, "servings"))?;
        Ok(Self {
            id: RecipeId::new(row.id),
            details: RecipeDetails {
                title: row.title,
                description: row.description,
                ingredients: row.ingredients,
                instructions: row.instructions,
                prep_time_minutes,
                servings,
                category_id: CategoryId::new(row.category_id),
            },
            photo_path: row.photo_path,
            author_id: UserId::new(row.user_id),
            revision: cast_revision(row.revision),
        })
    }
}

/// Recipe row joined with its category name and author username.
pub(crate) type RecipeViewRow = (RecipeRow, String, String);

/// Convert a joined recipe row into a view.
pub(crate) fn recipe_view(
    (row, category_name, author_name): RecipeViewRow,
) -> Result<RecipeView, EntityStoreError> {
    Ok(RecipeView {
        recipe: Recipe::try_from(row)?,
        category_name,
        author_name,
    })
}

/// Insertable struct for creating recipes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub photo_path: Option<&'a str>,
    pub category_id: i32,
    pub user_id: i32,
}

/// Changeset for editing a recipe. The author never changes.
///
/// `photo_path` is written as given, so `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes, treat_none_as_null = true)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub photo_path: Option<&'a str>,
    pub category_id: i32,
    pub revision: i32,
}
