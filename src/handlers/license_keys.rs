//! # License Key Handlers
//!
//! CRUD and query endpoints for license keys, plus the nested device and
//! feature listings.

use crate::db::models::{Device, LicenseFeature, LicenseKey};
use crate::db::{devices, license_features, license_keys};
use crate::error::AppResult;
use crate::schema::license_key::{
    LicenseKeyCreate, LicenseKeyOrderBy, LicenseKeyUpdate, LicenseKeyWhere,
};
use crate::schema::QueryArgs;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Issue a license key
///
/// ## Route
/// POST /api/license-keys
///
/// `issued` defaults to now, `isActivated` to false, `isEnable` to true.
/// An unknown `userId` is a 400 (foreign key violation).
pub async fn create_license_key(
    State(state): State<AppState>,
    Json(input): Json<LicenseKeyCreate>,
) -> AppResult<(StatusCode, Json<LicenseKey>)> {
    let key = license_keys::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(key)))
}

/// Fetch a license key by id
///
/// ## Route
/// GET /api/license-keys/{id}
pub async fn get_license_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LicenseKey>> {
    let key = license_keys::find_by_id(&state.db, &id).await?;
    Ok(Json(key))
}

/// Query license keys
///
/// ## Route
/// POST /api/license-keys/query
pub async fn query_license_keys(
    State(state): State<AppState>,
    Json(args): Json<QueryArgs<LicenseKeyWhere, LicenseKeyOrderBy>>,
) -> AppResult<Json<Vec<LicenseKey>>> {
    let keys = license_keys::list(&state.db, &args).await?;
    Ok(Json(keys))
}

/// Partially update a license key
///
/// ## Route
/// PATCH /api/license-keys/{id}
///
/// `updatedAt` is refreshed on every successful update.
pub async fn update_license_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LicenseKeyUpdate>,
) -> AppResult<Json<LicenseKey>> {
    let key = license_keys::update(&state.db, &id, input).await?;
    Ok(Json(key))
}

/// Revoke a license key (cascades to its devices and features)
///
/// ## Route
/// DELETE /api/license-keys/{id}
pub async fn delete_license_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    license_keys::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the devices bound to a license key
///
/// ## Route
/// GET /api/license-keys/{id}/devices
pub async fn get_license_key_devices(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Device>>> {
    license_keys::find_by_id(&state.db, &id).await?;
    let devices = devices::list_for_license_key(&state.db, &id).await?;
    Ok(Json(devices))
}

/// List the features attached to a license key
///
/// ## Route
/// GET /api/license-keys/{id}/features
pub async fn get_license_key_features(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<LicenseFeature>>> {
    license_keys::find_by_id(&state.db, &id).await?;
    let features = license_features::list_for_license_key(&state.db, &id).await?;
    Ok(Json(features))
}
