//! # License Feature Handlers
//!
//! CRUD and query endpoints for license features.

use crate::db::license_features;
use crate::db::models::LicenseFeature;
use crate::error::AppResult;
use crate::schema::license_feature::{
    LicenseFeatureCreate, LicenseFeatureOrderBy, LicenseFeatureUpdate, LicenseFeatureWhere,
};
use crate::schema::QueryArgs;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Attach a feature flag to a license key
///
/// ## Route
/// POST /api/license-features
///
/// Attaching the same feature name to the same key twice is a 409.
pub async fn create_license_feature(
    State(state): State<AppState>,
    Json(input): Json<LicenseFeatureCreate>,
) -> AppResult<(StatusCode, Json<LicenseFeature>)> {
    let feature = license_features::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

/// Fetch a feature by id
///
/// ## Route
/// GET /api/license-features/{id}
pub async fn get_license_feature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LicenseFeature>> {
    let feature = license_features::find_by_id(&state.db, id).await?;
    Ok(Json(feature))
}

/// Query features
///
/// ## Route
/// POST /api/license-features/query
pub async fn query_license_features(
    State(state): State<AppState>,
    Json(args): Json<QueryArgs<LicenseFeatureWhere, LicenseFeatureOrderBy>>,
) -> AppResult<Json<Vec<LicenseFeature>>> {
    let features = license_features::list(&state.db, &args).await?;
    Ok(Json(features))
}

/// Partially update a feature
///
/// ## Route
/// PATCH /api/license-features/{id}
pub async fn update_license_feature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<LicenseFeatureUpdate>,
) -> AppResult<Json<LicenseFeature>> {
    let feature = license_features::update(&state.db, id, input).await?;
    Ok(Json(feature))
}

/// Detach a feature from its license key
///
/// ## Route
/// DELETE /api/license-features/{id}
pub async fn delete_license_feature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    license_features::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
