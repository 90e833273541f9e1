use std::{env, fmt, str::FromStr};

use thiserror::Error;

/// Default SQLite database used outside production.
const DEFAULT_SQLITE_PATH: &str = "todos.db";

/// Errors raised while resolving configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when running in production with SQLite storage")]
    MissingDatabaseUrl,
    #[error("Unknown storage backend '{0}' (expected 'sqlite' or 'session')")]
    UnknownStorageBackend(String),
}

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Which storage backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Durable SQLite database.
    Sqlite,
    /// Per-session in-memory lists, lost on restart.
    Session,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "session" => Ok(Self::Session),
            _ => Err(ConfigError::UnknownStorageBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Session => write!(f, "session"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment (default: development)
    pub environment: Environment,
    /// Database location, with any `sqlite://` scheme removed (default: none)
    pub database_url: Option<String>,
    /// Explicitly requested storage backend (default: none)
    pub storage_backend: Option<StorageBackend>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `APP_ENV` - `production` selects production, anything else development
    /// - `DATABASE_URL` - SQLite database path or `sqlite://` URL
    /// - `STORAGE_BACKEND` - `sqlite` or `session`
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?;

        Ok(Self {
            environment: Environment::parse(env::var("APP_ENV").ok().as_deref()),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| strip_sqlite_scheme(&v).to_string()),
            storage_backend,
        })
    }

    /// Override the storage backend (e.g. from the command line).
    pub fn with_storage_backend(mut self, backend: Option<StorageBackend>) -> Self {
        if backend.is_some() {
            self.storage_backend = backend;
        }
        self
    }

    /// The backend to run with.
    ///
    /// An explicit choice wins; otherwise SQLite when a database is
    /// configured and session storage when none is.
    pub fn backend(&self) -> StorageBackend {
        match (self.storage_backend, &self.database_url) {
            (Some(backend), _) => backend,
            (None, Some(_)) => StorageBackend::Sqlite,
            (None, None) => StorageBackend::Session,
        }
    }

    /// Path of the SQLite database for the current environment.
    pub fn sqlite_path(&self) -> Result<&str, ConfigError> {
        match (&self.database_url, self.environment) {
            (Some(url), _) => Ok(url),
            (None, Environment::Development) => Ok(DEFAULT_SQLITE_PATH),
            (None, Environment::Production) => Err(ConfigError::MissingDatabaseUrl),
        }
    }
}

/// Strips a `sqlite://` or `sqlite:` scheme from a database URL.
fn strip_sqlite_scheme(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}
