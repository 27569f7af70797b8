//! # HTTP Request Handlers
//!
//! One submodule per API surface:
//! - `health`: health check endpoint (for monitoring)
//! - `greetings`: the hello/goodbye endpoints
//! - `users`, `license_keys`, `devices`, `license_features`: CRUD and
//!   query endpoints per model
//!
//! ## Handler Pattern
//! Handlers are async functions that:
//! 1. Extract data from the request (path params, query params, JSON body)
//! 2. Call the database layer
//! 3. Return a response (JSON, status code)

pub mod devices;
pub mod greetings;
pub mod health;
pub mod license_features;
pub mod license_keys;
pub mod users;
