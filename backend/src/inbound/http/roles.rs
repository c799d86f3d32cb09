//! Role administration handlers. Every route requires an administrator.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::RoleEdit;
use crate::domain::{Role, RoleId, RoleName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_revision, role_field_error};

/// Role as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "Usuario")]
    pub name: String,
    pub revision: u32,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.get(),
            name: role.name.as_ref().to_owned(),
            revision: role.revision,
        }
    }
}

/// Body for creating or renaming a role.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub name: String,
    #[serde(default)]
    pub revision: Option<i64>,
}

/// List every role, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "Roles", body = [RoleResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "listRoles"
)]
#[get("/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RoleResponse>>> {
    session.require_admin(state.clock.utc())?;
    let roles = state.roles.list().await?;
    Ok(web::Json(roles.into_iter().map(RoleResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role", body = RoleResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "getRole"
)]
#[get("/roles/{id}")]
pub async fn get_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<web::Json<RoleResponse>> {
    session.require_admin(state.clock.utc())?;
    let role = state.roles.get(RoleId::new(id.into_inner())).await?;
    Ok(web::Json(role.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Created", body = RoleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "createRole"
)]
#[post("/roles")]
pub async fn create_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin(state.clock.utc())?;
    let name = RoleName::new(&payload.name).map_err(role_field_error)?;
    let created = RoleResponse::from(state.roles.create(name).await?);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/roles/{}", created.id)))
        .json(created))
}

#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated", body = RoleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Stale revision or name taken", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "updateRole"
)]
#[put("/roles/{id}")]
pub async fn update_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<RoleResponse>> {
    session.require_admin(state.clock.utc())?;
    let RoleRequest { name, revision } = payload.into_inner();
    let edit = RoleEdit {
        id: RoleId::new(id.into_inner()),
        name: RoleName::new(&name).map_err(role_field_error)?,
        expected_revision: parse_revision(revision)?,
    };
    let updated = state.roles.update(edit).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a role. Roles still held by a user cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    params(("id" = i32, Path, description = "Role id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Role in use", body = ErrorSchema)
    ),
    tags = ["roles"],
    operation_id = "deleteRole"
)]
#[delete("/roles/{id}")]
pub async fn delete_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_admin(state.clock.utc())?;
    state.roles.delete(RoleId::new(id.into_inner())).await?;
    Ok(HttpResponse::NoContent().finish())
}
