//! Database layer for zodiac readings
//!
//! Provides:
//! - The SeaORM reading entity
//! - The `ReadingStore` seam with Postgres and in-memory implementations
//! - Connection pool management
//! - Idempotent schema creation

pub mod models;
mod memory;
mod repository;
pub mod schema;
mod store;

pub use memory::MemoryReadingStore;
pub use repository::Repository;
pub use store::{MonthCount, NewReading, ReadingStore, SavedReading};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;

/// Database connection pool wrapper
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Open a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to database..."
        );

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(config.sqlx_logging);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    #[cfg(test)]
    pub(crate) fn into_connection(self) -> DatabaseConnection {
        self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }

    /// Drain and close every pooled connection
    pub async fn close(&self) -> Result<()> {
        self.conn.close_by_ref().await?;
        info!("Database connections closed");
        Ok(())
    }
}

/// Open the store selected by configuration and make sure its schema exists.
///
/// `memory://` selects [`MemoryReadingStore`]; anything else is treated as a
/// Postgres connection string.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn ReadingStore>> {
    let store: Arc<dyn ReadingStore> = if config.is_memory() {
        info!("Using in-memory reading store");
        Arc::new(MemoryReadingStore::new())
    } else {
        let pool = DbPool::connect(config).await?;
        Arc::new(Repository::new(pool))
    };

    store.ensure_schema().await?;
    Ok(store)
}
