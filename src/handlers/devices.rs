//! # Device Handlers
//!
//! CRUD and query endpoints for devices.

use crate::db::devices;
use crate::db::models::Device;
use crate::error::AppResult;
use crate::schema::device::{DeviceCreate, DeviceOrderBy, DeviceUpdate, DeviceWhere};
use crate::schema::QueryArgs;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Register a device against a license key
///
/// ## Route
/// POST /api/devices
///
/// Re-registering the same hardware id on the same key is a 409.
pub async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<DeviceCreate>,
) -> AppResult<(StatusCode, Json<Device>)> {
    let device = devices::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Fetch a device by id
///
/// ## Route
/// GET /api/devices/{id}
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Device>> {
    let device = devices::find_by_id(&state.db, &id).await?;
    Ok(Json(device))
}

/// Query devices
///
/// ## Route
/// POST /api/devices/query
pub async fn query_devices(
    State(state): State<AppState>,
    Json(args): Json<QueryArgs<DeviceWhere, DeviceOrderBy>>,
) -> AppResult<Json<Vec<Device>>> {
    let devices = devices::list(&state.db, &args).await?;
    Ok(Json(devices))
}

/// Partially update a device
///
/// ## Route
/// PATCH /api/devices/{id}
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DeviceUpdate>,
) -> AppResult<Json<Device>> {
    let device = devices::update(&state.db, &id, input).await?;
    Ok(Json(device))
}

/// Deregister a device
///
/// ## Route
/// DELETE /api/devices/{id}
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    devices::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
