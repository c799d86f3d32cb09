//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    MockCategoryManagement, MockLoginService, MockRecipeManagement, MockRegistrationService,
    MockRoleManagement, MockUserManagement,
};
use crate::domain::{
    ADMIN_ROLE_NAME, Category, CategoryId, CategoryName, EmailAddress, PasswordHash, Recipe,
    RecipeDetails, RecipeId, RecipeView, RoleId, RoleName, SessionIdentity, User, UserId,
    UserView, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Path of the helper route installed by handler test apps.
pub const SEED_IDENTITY_PATH: &str = "/test/identity/{role}";

/// Id of the user every seeded session belongs to.
pub const SEEDED_USER_ID: i32 = 7;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Instant every handler test runs at.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_now()
    }
}

/// Mocked driving ports; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub categories: MockCategoryManagement,
    pub recipes: MockRecipeManagement,
    pub roles: MockRoleManagement,
    pub users: MockUserManagement,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::with_clock(
            HttpStatePorts {
                login: Arc::new(self.login),
                registration: Arc::new(self.registration),
                categories: Arc::new(self.categories),
                recipes: Arc::new(self.recipes),
                roles: Arc::new(self.roles),
                users: Arc::new(self.users),
            },
            Arc::new(FixtureClock),
        )
    }
}

/// Route body that signs the caller in as [`SEEDED_USER_ID`] with `role`.
pub async fn seed_identity(
    session: SessionContext,
    role: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = SessionIdentity::issue(
        UserId::new(SEEDED_USER_ID),
        "ana@x.com",
        role.into_inner(),
        fixture_now(),
    );
    session.persist_identity(&identity)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sign in through [`seed_identity`] and return the session cookie.
pub async fn login_as<S, B>(app: &S, role: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/identity/{role}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

/// Stored account fixture.
pub fn user_view(id: i32, username: &str, email: &str, role: &str) -> UserView {
    UserView {
        user: User {
            id: UserId::new(id),
            username: Username::new(username).expect("valid username"),
            email: EmailAddress::new(email).expect("valid email"),
            password_hash: PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            role_id: RoleId::new(if role == ADMIN_ROLE_NAME { 1 } else { 2 }),
            revision: 1,
        },
        role_name: RoleName::new(role).expect("valid role name"),
    }
}

/// Stored category fixture.
pub fn category(id: i32, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: CategoryName::new(name).expect("valid category name"),
        revision: 1,
    }
}

/// Stored recipe fixture in category 1, authored by the seeded user.
pub fn recipe_view(id: i32, title: &str) -> RecipeView {
    RecipeView {
        recipe: Recipe {
            id: RecipeId::new(id),
            details: RecipeDetails {
                title: title.to_owned(),
                description: "Postre clásico".to_owned(),
                ingredients: "huevos, leche".to_owned(),
                instructions: "Hornear".to_owned(),
                prep_time_minutes: 45,
                servings: 4,
                category_id: CategoryId::new(1),
            },
            photo_path: None,
            author_id: UserId::new(SEEDED_USER_ID),
            revision: 1,
        },
        category_name: "Postres".to_owned(),
        author_name: "ana".to_owned(),
    }
}
