//! Route table and session middleware for the `/api/v1` scope.
//!
//! The server binary and the integration tests assemble their apps from
//! these two functions so both exercise the same wiring.

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession, TtlExtensionPolicy},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration;
use actix_web::web;

use crate::domain::SESSION_TTL_HOURS;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::validation::{json_config, path_config, query_config};
use crate::inbound::http::{auth, categories, recipes, roles, users};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Cookie session middleware: private (encrypted and signed) content,
/// `HttpOnly`, and a persistent TTL that slides on every request.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(Duration::hours(SESSION_TTL_HOURS))
                .session_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
        )
        .build()
}

/// Register every API handler and the extractor configurations that keep
/// malformed input inside the error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use culinaria::inbound::http::routes::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register)
        .service(auth::current_session)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::create_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(recipes::list_recipes)
        .service(recipes::get_recipe)
        .service(recipes::create_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(roles::list_roles)
        .service(roles::get_role)
        .service(roles::create_role)
        .service(roles::update_role)
        .service(roles::delete_role)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user);
}
