//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use culinaria::inbound::http::session_config::SessionSettings;
use culinaria::outbound::memory::InMemoryStore;
use culinaria::outbound::persistence::DbPool;
use culinaria::outbound::storage::FilesystemPhotoStorage;

/// Backing store for every entity repository.
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL through the Diesel adapters.
    Postgres(DbPool),
    /// Process-local store used when no database is configured.
    Memory(Arc<InMemoryStore>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) photos: FilesystemPhotoStorage,
}

impl ServerConfig {
    /// Construct a server configuration backed by the in-memory store.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        photos: FilesystemPhotoStorage,
    ) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory(Arc::new(InMemoryStore::with_reference_roles())),
            photos,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    /// Storage the server's repositories will use.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
