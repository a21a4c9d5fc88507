use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::Config;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Defer the first physical connection until a query needs one.
    pub lazy: bool,
}

impl PoolConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_connections: config.db_max_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
            lazy: false,
        }
    }
}

/// Owns the process's PostgreSQL pool.
///
/// The pool is created on the first call to [`DbGateway::connect`] and cached
/// for the gateway's lifetime. Concurrent first callers wait on the same
/// initialization, so exactly one connection attempt is made.
pub struct DbGateway {
    database_url: String,
    pool_config: PoolConfig,
    pool: OnceCell<PgPool>,
    attempts: AtomicU32,
}

impl DbGateway {
    pub fn new(database_url: impl Into<String>, pool_config: PoolConfig) -> Self {
        Self {
            database_url: database_url.into(),
            pool_config,
            pool: OnceCell::new(),
            attempts: AtomicU32::new(0),
        }
    }

    /// Returns the cached pool, establishing it on first use.
    pub async fn connect(&self) -> Result<&PgPool, DbError> {
        self.pool
            .get_or_try_init(|| async {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                info!("Connecting to PostgreSQL...");

                let options = PgPoolOptions::new()
                    .max_connections(self.pool_config.max_connections)
                    .acquire_timeout(Duration::from_secs(self.pool_config.acquire_timeout_secs));
                let pool = if self.pool_config.lazy {
                    options.connect_lazy(&self.database_url)?
                } else {
                    options.connect(&self.database_url).await?
                };

                info!("PostgreSQL connection pool established");
                Ok(pool)
            })
            .await
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        let pool = self.connect().await?;
        MIGRATOR.run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Number of times a pool has been constructed. Never exceeds 1.
    #[cfg(test)]
    pub fn connection_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}
