//! User administration handlers. Every route requires an administrator.
//!
//! ```text
//! GET    /api/v1/users?page=2
//! POST   /api/v1/users {"username":"ana","email":"ana@x.com","password":"pass1","roleId":2}
//! GET    /api/v1/users/3
//! PUT    /api/v1/users/3 {"username":"ana","email":"ana@x.com","roleId":1,"revision":1}
//! DELETE /api/v1/users/3
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{UserDraft, UserEdit};
use crate::domain::{EmailAddress, PlainPassword, RoleId, UserId, UserView, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, parse_revision, user_field_error};

/// Account as exposed over HTTP. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "ana")]
    pub username: String,
    #[schema(example = "ana@x.com")]
    pub email: String,
    pub role_id: i32,
    #[schema(example = "Usuario")]
    pub role_name: String,
    /// Pass back on update to detect concurrent edits.
    pub revision: u32,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        let UserView { user, role_name } = view;
        Self {
            id: user.id.get(),
            username: user.username.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role_id: user.role_id.get(),
            role_name: role_name.as_ref().to_owned(),
            revision: user.revision,
        }
    }
}

/// Body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
}

/// Body for `PUT /api/v1/users/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    /// New password; omit or leave blank to keep the current one.
    #[serde(default)]
    pub password: Option<String>,
    pub role_id: i32,
    /// Revision the client last read; required.
    #[serde(default)]
    pub revision: Option<i64>,
}

fn user_draft(body: CreateUserRequest) -> ApiResult<UserDraft> {
    Ok(UserDraft {
        username: Username::new(&body.username).map_err(user_field_error)?,
        email: EmailAddress::new(&body.email).map_err(user_field_error)?,
        password: PlainPassword::new(&body.password).map_err(user_field_error)?,
        role_id: RoleId::new(body.role_id),
    })
}

fn user_edit(id: UserId, body: UpdateUserRequest) -> ApiResult<UserEdit> {
    let password = body
        .password
        .filter(|raw| !raw.is_empty())
        .map(|raw| PlainPassword::new(&raw))
        .transpose()
        .map_err(user_field_error)?;
    Ok(UserEdit {
        id,
        username: Username::new(&body.username).map_err(user_field_error)?,
        email: EmailAddress::new(&body.email).map_err(user_field_error)?,
        password,
        role_id: RoleId::new(body.role_id),
        expected_revision: parse_revision(body.revision)?,
    })
}

/// List accounts, five per page, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<UserResponse>>> {
    session.require_admin(state.clock.utc())?;
    let page = state.users.list(query.page).await?;
    Ok(web::Json(page.map(UserResponse::from)))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    session.require_admin(state.clock.utc())?;
    let view = state.users.get(UserId::new(id.into_inner())).await?;
    Ok(web::Json(view.into()))
}

/// Create an account with an explicit role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin(state.clock.utc())?;
    let draft = user_draft(payload.into_inner())?;
    let created = UserResponse::from(state.users.create(draft).await?);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/users/{}", created.id)))
        .json(created))
}

/// Replace an account's fields.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Stale revision or duplicate email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    session.require_admin(state.clock.utc())?;
    let edit = user_edit(UserId::new(id.into_inner()), payload.into_inner())?;
    let updated = state.users.update(edit).await?;
    Ok(web::Json(updated.into()))
}

/// Delete an account together with the recipes it authored.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_admin(state.clock.utc())?;
    state.users.delete(UserId::new(id.into_inner())).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
