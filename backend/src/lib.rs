//! Culinaria: a recipe-sharing service.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, services
//! and ports; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL, memory, Argon2
//! and the filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
