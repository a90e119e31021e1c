//! Database layer for BlogForge
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Connection pool management
//! - Schema bootstrap from the entity definitions

pub mod models;
mod repository;

pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use models::{ArticleEntity, UserEntity};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Create the `users` and `articles` tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        create_table_if_missing(&self.conn, UserEntity).await?;
        create_table_if_missing(&self.conn, ArticleEntity).await?;
        info!("Database schema ready");
        Ok(())
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

    /// Close every pooled connection
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Database connections closed");
        Ok(())
    }
}

async fn create_table_if_missing<E>(conn: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}
