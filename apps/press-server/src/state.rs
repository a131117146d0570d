//! Application state - shared across all handlers.

use std::sync::Arc;

use press_core::PostService;
use press_core::ports::{FileStorage, PasswordService, PostRepository, TokenService, UserRepository};
use press_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryStorage, InMemoryUserRepository,
    JwtConfig, JwtTokenService, LocalDiskStorage,
};

use crate::config::{AppConfig, StorageConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub storage: Arc<dyn FileStorage>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let storage: Arc<dyn FileStorage> = match &config.storage {
            StorageConfig::Local(root) => {
                tracing::info!(root = %root.display(), "Using local disk storage");
                Arc::new(LocalDiskStorage::new(root.clone()))
            }
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory storage. Uploaded files are lost on restart.");
                Arc::new(InMemoryStorage::new())
            }
        };

        let (posts, users) = repositories(config).await;

        tracing::info!("Application state initialized");

        Self::from_parts(posts, users, storage, config.jwt.clone())
    }

    /// Assemble state from already-built adapters.
    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        storage: Arc<dyn FileStorage>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            posts: PostService::new(posts, storage.clone()),
            storage,
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

fn in_memory() -> Repositories {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    use press_infra::database::{self, DatabaseConfig};
    use press_infra::{PostgresPostRepository, PostgresUserRepository};

    let Some(settings) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    let db_config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    };

    match database::connect(&db_config).await {
        Ok(conn) => (
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresUserRepository::new(conn)),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(config: &AppConfig) -> Repositories {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory()
}
