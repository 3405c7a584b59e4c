use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the data access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the single Postgres pool for the process. The pool is created on
/// first use and reused afterwards.
pub struct DatabaseManager {
    url: String,
    max_connections: u32,
    connection_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl DatabaseManager {
    pub fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .clone()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: config.max_connections,
            connection_timeout: Duration::from_secs(config.connection_timeout),
            pool: OnceCell::new(),
        })
    }

    /// Get the pool, connecting lazily on the first call
    pub async fn pool(&self) -> Result<&PgPool, DatabaseError> {
        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(self.connection_timeout)
                    .connect(&self.url)
                    .await?;
                info!("Created database pool for: {}", Self::redacted_url(&self.url));
                Ok::<_, DatabaseError>(pool)
            })
            .await
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool if it was ever opened (e.g., on shutdown)
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }

    /// Quote SQL identifier to prevent injection
    pub(crate) fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Connection string with the password masked, for logs
    fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}
