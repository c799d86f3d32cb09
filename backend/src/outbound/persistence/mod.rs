//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the entity repository
//! ports backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Revision checks are expressed in the `UPDATE` filter.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Constraint-aware errors**: unique and foreign key violations keep the
//!   constraint name so services can tell a duplicate email from a missing
//!   category.
//!
//! # Example
//!
//! ```ignore
//! use culinaria::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/culinaria")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_category_repository;
pub(crate) mod diesel_helpers;
mod diesel_recipe_repository;
mod diesel_role_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
