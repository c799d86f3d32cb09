//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::path::Path;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use culinaria::domain::{AdminProvisioning, EmailAddress, PlainPassword, Username};
use culinaria::inbound::http::health::HealthState;
use culinaria::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use culinaria::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use culinaria::outbound::storage::FilesystemPhotoStorage;
use culinaria::settings::{AdminBootstrap, AppSettings};
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server, provision_admin};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("load settings: {err}"))?;
    let session = load_session_settings(BuildMode::from_debug_assertions())?;
    let photos = open_photo_storage(&settings.images_dir())?;

    let mut config = ServerConfig::new(session, settings.bind_addr(), photos);
    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
        info!(applied, "database migrations up to date");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; data lives in memory and is lost on restart");
    }

    if let Some(admin) = settings.admin_bootstrap() {
        bootstrap_admin(&config, admin).await?;
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting HTTP server");
    create_server(health_state, config)?
        .await
        .wrap_err("HTTP server terminated")
}

fn load_session_settings(mode: BuildMode) -> Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), mode).wrap_err("session configuration")
}

fn open_photo_storage(dir: &Path) -> Result<FilesystemPhotoStorage> {
    FilesystemPhotoStorage::open(dir)
        .wrap_err_with(|| format!("open photo directory {}", dir.display()))
}

async fn bootstrap_admin(config: &ServerConfig, admin: AdminBootstrap) -> Result<()> {
    let username = Username::new(&admin.username)
        .map_err(|err| eyre!("invalid administrator username: {err}"))?;
    let email =
        EmailAddress::new(&admin.email).map_err(|err| eyre!("invalid administrator email: {err}"))?;
    let password = PlainPassword::new(admin.password.as_str())
        .map_err(|err| eyre!("invalid administrator password: {err}"))?;

    match provision_admin(config.storage(), username, email, password)
        .await
        .map_err(|err| eyre!("provision administrator: {err}"))?
    {
        AdminProvisioning::Created(user_id) => info!(%user_id, "administrator created"),
        AdminProvisioning::AlreadyPresent(user_id) => {
            info!(%user_id, "administrator already present");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Start-up helpers run against the real process environment.

    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn development_start_needs_no_session_setup() {
        let _guard = lock_env([
            ("SESSION_KEY_FILE", Some("/nonexistent/culinaria-session-key".to_owned())),
            ("SESSION_COOKIE_SECURE", None),
            ("SESSION_SAMESITE", None),
            ("SESSION_ALLOW_EPHEMERAL", None),
        ]);

        let settings = load_session_settings(BuildMode::Debug).expect("debug defaults apply");
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn release_start_rejects_missing_toggles() {
        let _guard = lock_env([
            ("SESSION_COOKIE_SECURE", None::<String>),
            ("SESSION_SAMESITE", None),
            ("SESSION_ALLOW_EPHEMERAL", None),
        ]);

        assert!(load_session_settings(BuildMode::Release).is_err());
    }
}
