//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`, and the
//! `pagination` crate knows nothing about OpenAPI. This module registers
//! mirror schemas for them so the generated document matches the wire format.

use utoipa::ToSchema;

use crate::inbound::http::categories::CategoryResponse;
use crate::inbound::http::recipes::RecipeResponse;
use crate::inbound::http::users::UserResponse;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with the current state of a resource.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, usually `{field, code}` for validation errors.
    details: Option<serde_json::Value>,
}

/// Declare the OpenAPI mirror of `pagination::Page<T>` for one item type.
macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[schema(rename_all = "camelCase")]
        #[expect(
            dead_code,
            reason = "Used only for OpenAPI schema generation via utoipa"
        )]
        pub struct $name {
            /// Items on this page, newest first.
            items: Vec<$item>,
            /// 1-based page number actually served.
            #[schema(example = 1)]
            page: u32,
            /// Fixed size of this listing's pages.
            page_size: u32,
            /// Rows in the whole listing.
            total_items: u64,
            /// Pages in the whole listing; zero when empty.
            total_pages: u64,
            /// Whether an earlier page exists.
            has_previous: bool,
            /// Whether a later page exists.
            has_next: bool,
        }
    };
}

page_schema! {
    /// One page of categories (5 per page).
    CategoryPageSchema, CategoryResponse
}

page_schema! {
    /// One page of recipes (3 per page).
    RecipePageSchema, RecipeResponse
}

page_schema! {
    /// One page of user accounts (5 per page).
    UserPageSchema, UserResponse
}
