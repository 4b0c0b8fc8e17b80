//! Postgres client with a fixed transaction policy.

use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

use crate::config::PostgresConfig;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Access mode of a transaction opened by [`PostgresDatabaseClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    ReadOnly,
    ReadWrite,
}

impl TransactionMode {
    /// Statement that pins the current transaction's isolation and access
    /// mode. Must be the first statement of the transaction.
    pub fn set_statement(self) -> &'static str {
        match self {
            TransactionMode::ReadOnly => {
                "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE, READ ONLY"
            }
            TransactionMode::ReadWrite => {
                "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE, READ WRITE"
            }
        }
    }
}

/// Build connection options from configuration.
pub fn connect_options(config: &PostgresConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new_without_pgpass()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database);

    if let Some(password) = &config.password {
        options = options.password(password.expose_secret());
    }

    options
}

/// Build pool options from configuration.
pub fn pool_options(config: &PostgresConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
}

/// Postgres client whose transactions all run at SERIALIZABLE isolation.
#[derive(Debug, Clone)]
pub struct PostgresDatabaseClient {
    pool: PgPool,
}

impl PostgresDatabaseClient {
    /// Create a client with a lazily connecting pool.
    ///
    /// Must be called inside a Tokio runtime; the pool spawns its
    /// maintenance task immediately.
    pub fn from_config(config: &PostgresConfig) -> Self {
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            max_connections = config.max_connections,
            "Creating Postgres connection pool"
        );
        let pool = pool_options(config).connect_lazy_with(connect_options(config));
        Self { pool }
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a SERIALIZABLE, READ ONLY transaction.
    pub async fn read_transaction(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        self.begin(TransactionMode::ReadOnly).await
    }

    /// Begin a SERIALIZABLE, READ WRITE transaction.
    pub async fn read_write_transaction(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        self.begin(TransactionMode::ReadWrite).await
    }

    async fn begin(
        &self,
        mode: TransactionMode,
    ) -> Result<Transaction<'static, Postgres>, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(mode.set_statement()).execute(&mut *tx).await?;
        Ok(tx)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
