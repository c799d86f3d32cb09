//! Provision an administrator account in the PostgreSQL database.
//!
//! The password is read from the first line of standard input so it never
//! appears in shell history or process listings.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, BufRead};
use std::sync::Arc;

use clap::Parser;
use culinaria::domain::{AdminProvisioning, EmailAddress, PlainPassword, UserService, Username};
use culinaria::outbound::persistence::{
    DbPool, DieselRoleRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use culinaria::outbound::security::Argon2PasswordHasher;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const DATABASE_URL_ENV: &str = "CULINARIA_DATABASE_URL";

/// `create-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-admin",
    about = "Create an administrator account; the password is read from stdin",
    version
)]
struct CliArgs {
    /// Email address of the administrator.
    #[arg(long, value_name = "email")]
    email: String,
    /// Display name of the administrator.
    #[arg(long, value_name = "name", default_value = "admin")]
    username: String,
    /// Database connection URL. Falls back to `CULINARIA_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    let username = Username::new(&args.username).map_err(invalid_input)?;
    let email = EmailAddress::new(&args.email).map_err(invalid_input)?;
    let password = read_password(io::stdin().lock())?;

    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = UserService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselRoleRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let outcome = service
        .provision_admin(username, email, password)
        .await
        .map_err(|error| io::Error::other(format!("provision administrator: {error}")))?;

    match outcome {
        AdminProvisioning::Created(id) => println!("created administrator id={id}"),
        AdminProvisioning::AlreadyPresent(id) => {
            println!("email already registered id={id}; nothing changed");
        }
    }
    Ok(())
}

fn invalid_input(error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
}

fn read_password(mut input: impl BufRead) -> io::Result<PlainPassword> {
    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']);
    PlainPassword::new(trimmed).map_err(invalid_input)
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (value, source) = match explicit {
        Some(value) => (value, "--database-url"),
        None => (
            from_env.ok_or_else(|| {
                invalid_input("database URL missing: set --database-url or CULINARIA_DATABASE_URL")
            })?,
            DATABASE_URL_ENV,
        ),
    };
    if value.trim().is_empty() {
        return Err(invalid_input(format!("{source} must not be empty")));
    }
    Ok(value)
}
