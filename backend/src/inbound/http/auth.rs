//! Login, logout, registration and session introspection.
//!
//! ```text
//! POST /api/v1/login {"email":"ana@x.com","password":"pass1","returnUrl":"/recipes"}
//! POST /api/v1/logout
//! POST /api/v1/register {"username":"ana","email":"ana@x.com","password":"pass1"}
//! GET  /api/v1/session
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, ErrorCode, LoginCredentials, RegistrationRequest, SessionIdentity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::user_field_error;

const LOGIN_PATH: &str = "/login";
const HOME_PATH: &str = "/";

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Local path to continue to after login.
    #[serde(default)]
    pub return_url: Option<String>,
}

/// Body returned alongside the login redirect.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
    pub redirect_to: String,
}

/// Self-registration body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Current session as reported by `GET /api/v1/session`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: i32,
    pub email: String,
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionIdentity> for SessionResponse {
    fn from(identity: SessionIdentity) -> Self {
        Self {
            user_id: identity.subject_id.get(),
            email: identity.principal,
            role: identity.role,
            issued_at: identity.issued_at,
            expires_at: identity.expires_at,
        }
    }
}

/// Accept only same-site absolute paths as redirect targets.
///
/// # Examples
/// ```
/// use culinaria::inbound::http::auth::safe_return_url;
///
/// assert_eq!(safe_return_url(Some("/recipes?page=2")), "/recipes?page=2");
/// assert_eq!(safe_return_url(Some("//evil.example")), "/");
/// assert_eq!(safe_return_url(Some("https://evil.example")), "/");
/// assert_eq!(safe_return_url(None), "/");
/// ```
pub fn safe_return_url(raw: Option<&str>) -> &str {
    match raw {
        Some(url)
            if url.starts_with('/')
                && !url.starts_with("//")
                && !url.starts_with("/\\")
                && !url.contains("://") =>
        {
            url
        }
        _ => HOME_PATH,
    }
}

fn invalid_credentials(email: &str) -> Error {
    Error::unauthorized("invalid credentials").with_details(json!({ "email": email }))
}

/// Authenticate and establish a session.
///
/// Every failure, including blank fields, answers the same `401` so the
/// response never reveals which part of the credentials was wrong.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Logged in", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"),
                    ("Location" = String, description = "Where to continue"))),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest {
        email,
        password,
        return_url,
    } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(|err| {
        info!(reason = %err, "login rejected");
        invalid_credentials(&email)
    })?;
    let user = state
        .login
        .authenticate(&credentials)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::Unauthorized => invalid_credentials(&email),
            _ => err,
        })?;

    let identity = SessionIdentity::issue(user.user_id, user.email, user.role, state.clock.utc());
    session.persist_identity(&identity)?;
    info!(user_id = %identity.subject_id, "login succeeded");

    let target = safe_return_url(return_url.as_deref()).to_owned();
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target.clone()))
        .json(LoginResponse {
            email: identity.principal,
            role: identity.role,
            expires_at: identity.expires_at,
            redirect_to: target,
        }))
}

/// End the session and send the client back to the login page.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 303, description = "Logged out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}

/// Create an account with the default role.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 303, description = "Registered; continue to login", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Default role missing", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let request = RegistrationRequest::try_from_parts(&username, &email, &password)
        .map_err(user_field_error)?;
    let created = state.registration.register(request).await?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .json(UserResponse::from(created)))
}

/// Report the caller's session, extending it.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No live session", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let identity = session.require_identity(state.clock.utc())?;
    Ok(web::Json(identity.into()))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
