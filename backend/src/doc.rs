//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request/response DTOs and
//! the mirror schemas from [`crate::inbound::http::schemas`] that describe
//! domain and pagination types without coupling them to utoipa. The document
//! is served by Swagger UI in debug builds and exported by the
//! `openapi-dump` binary.

use crate::inbound::http::auth::{LoginRequest, LoginResponse, RegisterRequest, SessionResponse};
use crate::inbound::http::categories::{CategoryRequest, CategoryResponse};
use crate::inbound::http::recipes::{RecipeRequest, RecipeResponse};
use crate::inbound::http::roles::{RoleRequest, RoleResponse};
use crate::inbound::http::schemas::{
    CategoryPageSchema, ErrorCodeSchema, ErrorSchema, RecipePageSchema, UserPageSchema,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::inbound::http::validation::PhotoPayload;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Culinaria API",
        description = "Recipe sharing: categories, recipes, and account administration behind a cookie session."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::roles::get_role,
        crate::inbound::http::roles::create_role,
        crate::inbound::http::roles::update_role,
        crate::inbound::http::roles::delete_role,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        RegisterRequest,
        SessionResponse,
        CategoryRequest,
        CategoryResponse,
        CategoryPageSchema,
        RecipeRequest,
        RecipeResponse,
        RecipePageSchema,
        PhotoPayload,
        RoleRequest,
        RoleResponse,
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        UserPageSchema,
    )),
    tags(
        (name = "auth", description = "Login, logout and self-registration"),
        (name = "categories", description = "Recipe categories"),
        (name = "recipes", description = "Recipes with photos"),
        (name = "roles", description = "Role administration (administrators only)"),
        (name = "users", description = "Account administration (administrators only)"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
