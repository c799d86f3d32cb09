//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod recipes;
pub mod roles;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
