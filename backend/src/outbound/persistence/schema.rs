//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Account roles. `name` is unique (`roles_name_key`).
    roles (id) {
        id -> Int4,
        name -> Varchar,
        /// Optimistic concurrency counter, starts at 1.
        revision -> Int4,
    }
}

diesel::table! {
    /// User accounts. `email` is unique (`users_email_key`).
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Restricts deletion of the referenced role.
        role_id -> Int4,
        revision -> Int4,
    }
}

diesel::table! {
    /// Recipe categories.
    categories (id) {
        id -> Int4,
        name -> Varchar,
        revision -> Int4,
    }
}

diesel::table! {
    /// Recipes. Rows disappear with their category or author.
    recipes (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        ingredients -> Text,
        instructions -> Text,
        prep_time_minutes -> Int4,
        servings -> Int4,
        /// Public path of the stored photo, e.g. `/images/<uuid>.jpg`.
        photo_path -> Nullable<Text>,
        category_id -> Int4,
        user_id -> Int4,
        revision -> Int4,
    }
}

diesel::joinable!(users -> roles (role_id));
diesel::joinable!(recipes -> categories (category_id));
diesel::joinable!(recipes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(roles, users, categories, recipes);
