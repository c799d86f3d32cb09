//! Shared harness for integration suites.
//!
//! Builds the full `/api/v1` surface over the in-memory store, a temporary
//! photo directory and a clock the tests can move forward.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use culinaria::Trace;
use culinaria::domain::{
    CategoryService, CredentialLoginService, EmailAddress, PlainPassword, RecipeService,
    RoleService, UserRegistrationService, UserService, Username,
};
use culinaria::inbound::http::routes::{SESSION_COOKIE_NAME, configure_api, session_middleware};
use culinaria::inbound::http::session_config::SessionSettings;
use culinaria::inbound::http::state::{HttpState, HttpStatePorts};
use culinaria::outbound::memory::InMemoryStore;
use culinaria::outbound::security::Argon2PasswordHasher;
use culinaria::outbound::storage::FilesystemPhotoStorage;
use mockable::Clock;
use serde_json::Value;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@x.com";
pub const ADMIN_PASSWORD: &str = "adminpass";

/// Instant every suite starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid start time")
}

/// Clock that only moves when a test advances it.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Everything a suite needs to drive the API.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub photos_dir: TempDir,
    state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::with_reference_roles());
        let clock = Arc::new(MutableClock::new(start_time()));
        let photos_dir = TempDir::new().expect("photo dir");
        let photos =
            Arc::new(FilesystemPhotoStorage::open(photos_dir.path()).expect("open photo storage"));
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let ports = HttpStatePorts {
            login: Arc::new(CredentialLoginService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&hasher),
            )),
            registration: Arc::new(UserRegistrationService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&hasher),
            )),
            categories: Arc::new(CategoryService::new(Arc::clone(&store), Arc::clone(&photos))),
            recipes: Arc::new(RecipeService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&photos),
            )),
            roles: Arc::new(RoleService::new(Arc::clone(&store))),
            users: Arc::new(
                UserService::new(Arc::clone(&store), Arc::clone(&store), hasher)
                    .with_photo_storage(photos),
            ),
        };
        let state = HttpState::with_clock(ports, Arc::clone(&clock) as Arc<dyn Clock>);
        Self {
            store,
            clock,
            photos_dir,
            state,
        }
    }

    /// Full application as the server mounts it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let settings = SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        };
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(&settings))
                    .configure(configure_api),
            )
    }

    /// Create the administrator account used by admin-only suites.
    pub async fn provision_admin(&self) {
        UserService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::new(Argon2PasswordHasher::new()),
        )
        .provision_admin(
            Username::new("admin").expect("username"),
            EmailAddress::new(ADMIN_EMAIL).expect("email"),
            PlainPassword::new(ADMIN_PASSWORD).expect("password"),
        )
        .await
        .expect("provision administrator");
    }
}

/// Decoded response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

/// Browser stand-in that keeps the latest session cookie.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `request`, remembering any session cookie the server sets.
    pub async fn send<S, B>(&mut self, app: &S, request: test::TestRequest) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply {
            status,
            location,
            body,
        }
    }

    /// Log in and assert the redirect.
    pub async fn login<S, B>(&mut self, app: &S, email: &str, password: &str) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let reply = self
            .send(
                app,
                test::TestRequest::post()
                    .uri("/api/v1/login")
                    .set_json(serde_json::json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "login failed: {reply:?}");
        reply
    }
}
