//! # User Handlers
//!
//! CRUD and query endpoints for users.

use crate::db::models::{LicenseKey, User};
use crate::db::{license_keys, users};
use crate::error::AppResult;
use crate::schema::user::{UserCreate, UserOrderBy, UserUpdate, UserWhere};
use crate::schema::QueryArgs;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Create a user
///
/// ## Route
/// POST /api/users
///
/// Returns 201 with the stored row; a duplicate email is a 409.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = users::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Fetch a user by id
///
/// ## Route
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = users::find_by_id(&state.db, &id).await?;
    Ok(Json(user))
}

/// Fetch a user by unique email
///
/// ## Route
/// GET /api/users/by-email/{email}
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<User>> {
    let user = users::find_by_email(&state.db, &email).await?;
    Ok(Json(user))
}

/// Query users
///
/// ## Route
/// POST /api/users/query
///
/// ## Request
/// ```json
/// { "where": { "email": { "endsWith": "@example.com" } },
///   "orderBy": { "email": "asc" },
///   "skip": 0, "take": 50 }
/// ```
pub async fn query_users(
    State(state): State<AppState>,
    Json(args): Json<QueryArgs<UserWhere, UserOrderBy>>,
) -> AppResult<Json<Vec<User>>> {
    let users = users::list(&state.db, &args).await?;
    Ok(Json(users))
}

/// Partially update a user
///
/// ## Route
/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let user = users::update(&state.db, &id, input).await?;
    Ok(Json(user))
}

/// Delete a user (cascades to their license keys)
///
/// ## Route
/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    users::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a user's license keys
///
/// ## Route
/// GET /api/users/{id}/license-keys
pub async fn get_user_license_keys(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<LicenseKey>>> {
    // 404 for an unknown user rather than an empty list
    users::find_by_id(&state.db, &id).await?;
    let keys = license_keys::list_for_user(&state.db, &id).await?;
    Ok(Json(keys))
}
