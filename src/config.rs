//! # Configuration Management
//!
//! Loads configuration from environment variables, following the
//! "12-factor app" approach. A `.env` file is honored for local
//! development.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 8080)
//! - `DATABASE_URL`: SQLite database connection string

use anyhow::Result;
use std::env;

/// Application configuration.
///
/// All fields are public for easy access from other modules.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to.
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number (1-65535).
    pub port: u16,

    /// SQLite database connection URL.
    /// Format: "sqlite:license.db?mode=rwc" ("mode=rwc" = read, write,
    /// create if not exists)
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads variables from a `.env` file first (if present), then reads
    /// each value from the environment, falling back to defaults suitable
    /// for local development. Returns an error if `PORT` is not a valid
    /// number.
    pub fn from_env() -> Result<Self> {
        // dotenvy doesn't error if the file is missing
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:license.db?mode=rwc".to_string()),
        })
    }

    /// Get the socket address to bind the server to.
    ///
    /// Combines host and port into the format expected by
    /// `tokio::net::TcpListener::bind()`, e.g. "127.0.0.1:8080".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
