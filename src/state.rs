//! # Application State
//!
//! Shared state handed to every request handler. A connection pool is
//! created once at startup and cloned into handlers by Axum; cloning a
//! `SqlitePool` is cheap (it is itself a handle to the pool).

use crate::config::Config;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,
}

impl AppState {
    /// Connect to the database, run embedded migrations, and return the
    /// initialized state.
    ///
    /// # Errors
    /// Returns an error if the database connection or a migration fails.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = SqlitePool::connect(&config.database_url).await?;

        // Migrations are embedded from ./migrations and tracked by sqlx,
        // so re-running them at startup is a no-op.
        crate::db::MIGRATOR.run(&db).await?;

        Ok(AppState { db })
    }
}
