//! # Router Assembly
//!
//! Builds the application router: health check, greeting endpoints, and
//! the per-model CRUD/query routes, wrapped in CORS and request tracing
//! layers. Kept separate from `main` so the integration tests can build
//! the same router against a test database.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::devices::*;
use crate::handlers::greetings::{goodbye, hello};
use crate::handlers::health::health_check;
use crate::handlers::license_features::*;
use crate::handlers::license_keys::*;
use crate::handlers::users::*;
use crate::state::AppState;

/// Build the application router with all routes and middleware layers.
pub fn router(state: AppState) -> Router {
    // Permissive CORS: the API is consumed by a separately served
    // frontend. Restrict the origins when deploying.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Greetings
        .route("/api/hello", get(hello))
        .route("/api/goodbye", get(goodbye))
        // Users
        .route("/api/users", post(create_user))
        .route("/api/users/query", post(query_users))
        .route("/api/users/by-email/{email}", get(get_user_by_email))
        .route(
            "/api/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/license-keys", get(get_user_license_keys))
        // License keys
        .route("/api/license-keys", post(create_license_key))
        .route("/api/license-keys/query", post(query_license_keys))
        .route(
            "/api/license-keys/{id}",
            get(get_license_key)
                .patch(update_license_key)
                .delete(delete_license_key),
        )
        .route(
            "/api/license-keys/{id}/devices",
            get(get_license_key_devices),
        )
        .route(
            "/api/license-keys/{id}/features",
            get(get_license_key_features),
        )
        // Devices
        .route("/api/devices", post(create_device))
        .route("/api/devices/query", post(query_devices))
        .route(
            "/api/devices/{id}",
            get(get_device).patch(update_device).delete(delete_device),
        )
        // License features
        .route("/api/license-features", post(create_license_feature))
        .route("/api/license-features/query", post(query_license_features))
        .route(
            "/api/license-features/{id}",
            get(get_license_feature)
                .patch(update_license_feature)
                .delete(delete_license_feature),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
