//! Domain entities, validation and use-case services.
//!
//! Purpose: define strongly typed entities for the recipe-sharing domain and
//! the services that orchestrate them through ports. Nothing in here depends
//! on Actix, Diesel or the filesystem.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Role, User, Category, Recipe and their validated field types.
//! - SessionIdentity: what the session cookie carries.
//! - Listing: fixed page sizes per listing.
//! - Services implementing the driving ports in [`ports`].

pub mod auth;
pub mod category;
pub mod category_service;
pub mod error;
pub mod ids;
pub mod listing;
pub mod login_service;
mod photo_cleanup;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod registration_service;
pub mod role;
pub mod role_service;
pub mod session;
mod store_errors;
mod text;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{LoginCredentials, LoginValidationError, RegistrationRequest};
pub use self::category::{CATEGORY_NAME_MAX, Category, CategoryName, CategoryValidationError};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{CategoryId, RecipeId, RoleId, UserId};
pub use self::listing::Listing;
pub use self::login_service::CredentialLoginService;
pub use self::recipe::{
    NewRecipe, PhotoUpload, RECIPE_TITLE_MAX, Recipe, RecipeChanges, RecipeDetails, RecipeFields,
    RecipeFilter, RecipeValidationError, RecipeView,
};
pub use self::recipe_service::RecipeService;
pub use self::registration_service::{RegistrationError, UserRegistrationService};
pub use self::role::{
    ADMIN_ROLE_NAME, DEFAULT_ROLE_NAME, ROLE_NAME_MAX, Role, RoleName, RoleValidationError,
};
pub use self::role_service::RoleService;
pub use self::session::{SESSION_TTL_HOURS, SessionIdentity, session_ttl};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, PASSWORD_MAX, PasswordHash, PlainPassword, USERNAME_MAX, User,
    UserChanges, UserValidationError, UserView, Username,
};
pub use self::user_service::{AdminProvisioning, UserService};

/// Convenient result alias for use-cases.
///
/// # Examples
/// ```
/// use culinaria::domain::{ApiResult, Error};
///
/// fn denied() -> ApiResult<()> {
///     Err(Error::forbidden("administrators only"))
/// }
/// assert!(denied().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
