use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to connect: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Connection settings of the Postgres store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Applied to every transaction with `SET LOCAL lock_timeout`
    pub lock_timeout_ms: u64,
}

impl PostgresConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            lock_timeout_ms: 2000,
        }
    }

    /// Reads `DATABASE_URL`, `ITAM_DB_MAX_CONNECTIONS`, `ITAM_DB_ACQUIRE_TIMEOUT_SECS`
    /// and `ITAM_LOCK_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, PostgresConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| PostgresConfigError::MissingDatabaseUrl)?;
        let defaults = Self::new(database_url);
        Ok(Self {
            max_connections: env_or("ITAM_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout_secs: env_or(
                "ITAM_DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            )?,
            lock_timeout_ms: env_or("ITAM_LOCK_TIMEOUT_MS", defaults.lock_timeout_ms)?,
            ..defaults
        })
    }

    pub async fn connect(&self) -> Result<PgPool, PostgresConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect(&self.database_url)
            .await?;
        Ok(pool)
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, PostgresConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| PostgresConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
