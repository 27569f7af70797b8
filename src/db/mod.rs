//! # Database Module
//!
//! One submodule per table plus the row structs:
//! - `models`: row structs (`User`, `LicenseKey`, `Device`, `LicenseFeature`)
//! - `users`, `license_keys`, `devices`, `license_features`: CRUD and
//!   list queries for the corresponding table
//!
//! List queries take the typed inputs from `crate::schema` and assemble
//! SQL through `sqlx::QueryBuilder`; everything user-supplied is bound.

pub mod devices;
pub mod license_features;
pub mod license_keys;
pub mod models;
pub mod users;

/// Embedded migrations from ./migrations, shared by the server startup
/// path and the test suite.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
