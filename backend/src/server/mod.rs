//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, Storage};
pub use state_builders::provision_admin;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use culinaria::Trace;
#[cfg(debug_assertions)]
use culinaria::doc::ApiDoc;
use culinaria::inbound::http::health::{HealthState, live, ready};
use culinaria::inbound::http::routes::{configure_api, session_middleware};
use culinaria::inbound::http::session_config::SessionSettings;
use culinaria::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: Arc<SessionSettings>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(&session))
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with session, binding and storage settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        session,
        bind_addr,
        storage,
        photos,
    } = config;
    let http_state = build_http_state(&storage, Arc::new(photos));
    let session = Arc::new(session);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: Arc::clone(&session),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use culinaria::outbound::memory::InMemoryStore;
    use culinaria::outbound::storage::FilesystemPhotoStorage;
    use serde_json::json;
    use tempfile::TempDir;

    fn deps(temp: &TempDir) -> AppDependencies {
        let storage = Storage::Memory(Arc::new(InMemoryStore::with_reference_roles()));
        let photos = FilesystemPhotoStorage::open(temp.path()).expect("photo dir");
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&storage, Arc::new(photos)),
            session: Arc::new(SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            }),
        }
    }

    #[actix_web::test]
    async fn api_routes_sit_behind_the_session_scope() {
        let temp = TempDir::new().expect("temp dir");
        let app = test::init_service(build_app(deps(&temp))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/categories").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn registration_then_login_issues_a_session_cookie() {
        let temp = TempDir::new().expect("temp dir");
        let app = test::init_service(build_app(deps(&temp))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "ana", "email": "ana@x.com", "password": "pass1"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"email": "ana@x.com", "password": "pass1"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
    }

    #[actix_web::test]
    async fn readiness_probe_is_mounted_outside_the_api_scope() {
        let temp = TempDir::new().expect("temp dir");
        let deps = deps(&temp);
        deps.health_state.mark_ready();
        let app = test::init_service(build_app(deps)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
