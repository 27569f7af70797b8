//! # License Service Backend
//!
//! A small HTTP backend for a licensing data model: greeting endpoints,
//! plus CRUD and typed query endpoints over users, license keys, devices
//! and license features.
//!
//! ## Modules
//! - `config`: environment-based configuration
//! - `state`: shared application state (database pool)
//! - `error`: application error type and HTTP mapping
//! - `schema`: strict, typed request inputs (filters, sorts,
//!   create/update variants) mirroring the database schema
//! - `db`: row structs and per-table queries
//! - `handlers`: HTTP route handlers
//! - `app`: router assembly

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod schema;
pub mod state;
