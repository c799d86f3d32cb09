//! Category handlers. Any signed-in user may manage categories.
//!
//! ```text
//! GET    /api/v1/categories?page=1
//! POST   /api/v1/categories {"name":"Postres"}
//! PUT    /api/v1/categories/4 {"name":"Dulces","revision":1}
//! DELETE /api/v1/categories/4
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::CategoryEdit;
use crate::domain::{Category, CategoryId, CategoryName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CategoryPageSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, category_field_error, parse_revision};

/// Category as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[schema(example = 4)]
    pub id: i32,
    #[schema(example = "Postres")]
    pub name: String,
    pub revision: u32,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.as_ref().to_owned(),
            revision: category.revision,
        }
    }
}

/// Body for creating or renaming a category.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    /// Revision the client last read; required on update, ignored on create.
    #[serde(default)]
    pub revision: Option<i64>,
}

/// List categories, five per page, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(PageQuery),
    responses(
        (status = 200, description = "Categories", body = CategoryPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<CategoryResponse>>> {
    session.require_identity(state.clock.utc())?;
    let page = state.categories.list(query.page).await?;
    Ok(web::Json(page.map(CategoryResponse::from)))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<web::Json<CategoryResponse>> {
    session.require_identity(state.clock.utc())?;
    let category = state.categories.get(CategoryId::new(id.into_inner())).await?;
    Ok(web::Json(category.into()))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    session.require_identity(state.clock.utc())?;
    let name = CategoryName::new(&payload.name).map_err(category_field_error)?;
    let created = CategoryResponse::from(state.categories.create(name).await?);
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/v1/categories/{}", created.id),
        ))
        .json(created))
}

/// Rename a category.
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Stale revision", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[put("/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    session.require_identity(state.clock.utc())?;
    let CategoryRequest { name, revision } = payload.into_inner();
    let edit = CategoryEdit {
        id: CategoryId::new(id.into_inner()),
        name: CategoryName::new(&name).map_err(category_field_error)?,
        expected_revision: parse_revision(revision)?,
    };
    let updated = state.categories.update(edit).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a category and every recipe filed under it.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_identity(state.clock.utc())?;
    state
        .categories
        .delete(CategoryId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
