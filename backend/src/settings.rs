//! Application settings loaded via OrthoConfig.
//!
//! Values come from `CULINARIA_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_IMAGES_DIR: &str = "wwwroot/images";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Server and storage configuration.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "CULINARIA")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without it the server keeps all data in
    /// memory.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// Directory uploaded recipe photos are written to.
    pub images_dir: Option<PathBuf>,
    /// Email of the administrator provisioned at start-up.
    pub admin_email: Option<String>,
    /// Password of the administrator provisioned at start-up.
    pub admin_password: Option<String>,
    /// Username of the administrator provisioned at start-up.
    pub admin_username: Option<String>,
    /// Upper bound on pooled database connections; zero selects the default.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

/// Credentials of the administrator to provision when missing.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: zeroize::Zeroizing<String>,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AppSettings {
    /// Socket address to listen on, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }

    /// Photo directory, defaulting to `wwwroot/images`.
    pub fn images_dir(&self) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR))
    }

    /// Pool size, defaulting to 10 when unset or zero.
    pub fn db_max_connections(&self) -> u32 {
        match self.db_max_connections {
            0 => DEFAULT_DB_MAX_CONNECTIONS,
            size => size,
        }
    }

    /// Administrator to provision, when both email and password are set.
    pub fn admin_bootstrap(&self) -> Option<AdminBootstrap> {
        let email = self.admin_email.as_deref().map(str::trim)?;
        let password = self.admin_password.as_deref()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(AdminBootstrap {
            username: self
                .admin_username
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_owned()),
            email: email.to_owned(),
            password: zeroize::Zeroizing::new(password.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "CULINARIA_DATABASE_URL",
        "CULINARIA_BIND_ADDR",
        "CULINARIA_IMAGES_DIR",
        "CULINARIA_ADMIN_EMAIL",
        "CULINARIA_ADMIN_PASSWORD",
        "CULINARIA_ADMIN_USERNAME",
        "CULINARIA_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("culinaria")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.images_dir(), PathBuf::from("wwwroot/images"));
        assert_eq!(settings.db_max_connections(), 10);
        assert!(settings.admin_bootstrap().is_none());
    }

    #[rstest]
    fn zero_pool_size_selects_the_default() {
        let settings = AppSettings {
            db_max_connections: 0,
            ..AppSettings::default()
        };
        assert_eq!(settings.db_max_connections(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "CULINARIA_DATABASE_URL",
                Some("postgres://localhost/culinaria".to_owned()),
            ),
            ("CULINARIA_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("CULINARIA_IMAGES_DIR", Some("/srv/images".to_owned())),
            ("CULINARIA_ADMIN_EMAIL", Some("root@x.com".to_owned())),
            ("CULINARIA_ADMIN_PASSWORD", Some("s3cret".to_owned())),
            ("CULINARIA_ADMIN_USERNAME", None),
            ("CULINARIA_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/culinaria")
        );
        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(settings.images_dir(), PathBuf::from("/srv/images"));
        assert_eq!(settings.db_max_connections(), 4);
        let admin = settings.admin_bootstrap().expect("admin configured");
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.email, "root@x.com");
        assert_eq!(admin.password.as_str(), "s3cret");
    }

    #[rstest]
    #[case(Some("root@x.com"), None)]
    #[case(None, Some("s3cret"))]
    #[case(Some("  "), Some("s3cret"))]
    fn admin_bootstrap_needs_email_and_password(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
    ) {
        let settings = AppSettings {
            admin_email: email.map(str::to_owned),
            admin_password: password.map(str::to_owned),
            ..AppSettings::default()
        };
        assert!(settings.admin_bootstrap().is_none());
    }
}
