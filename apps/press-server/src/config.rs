//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use press_infra::JwtConfig;

/// Where uploaded files are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// A directory on the local filesystem.
    Local(PathBuf),
    /// A process-local map; files vanish on restart.
    Memory,
}

impl StorageConfig {
    fn from_value(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("memory") => StorageConfig::Memory,
            Some(root) if !root.is_empty() => StorageConfig::Local(PathBuf::from(root)),
            _ => StorageConfig::Local(PathBuf::from("storage/app")),
        }
    }
}

/// Connection settings for the primary database.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseSettings {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            storage: StorageConfig::from_value(env::var("STORAGE_ROOT").ok()),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
