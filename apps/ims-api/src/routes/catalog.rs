//! Color and size routes.
//!
//! A color or size still used by a variation can't be deleted (409).

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use ims_core::validation::validate_catalog_name;
use ims_core::{Color, Size};
use serde::Deserialize;

use crate::auth::ActingUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

// =============================================================================
// Colors
// =============================================================================

pub async fn list_colors(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<Vec<Color>>, ApiError> {
    Ok(Json(state.db.catalog().list_colors(user.id().as_str()).await?))
}

pub async fn create_color(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Json(body): Json<NameRequest>,
) -> Result<(StatusCode, Json<Color>), ApiError> {
    validate_catalog_name("name", &body.name)?;

    let color = state
        .db
        .catalog()
        .create_color(user.id().as_str(), &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(color)))
}

pub async fn get_color(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<Json<Color>, ApiError> {
    state
        .db
        .catalog()
        .get_color(&id, user.id().as_str())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Color", &id))
}

pub async fn update_color(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
    Json(body): Json<NameRequest>,
) -> Result<Json<Color>, ApiError> {
    validate_catalog_name("name", &body.name)?;

    let color = state
        .db
        .catalog()
        .update_color(&id, user.id().as_str(), &body.name)
        .await?;
    Ok(Json(color))
}

pub async fn delete_color(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .db
        .catalog()
        .delete_color(&id, user.id().as_str())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sizes
// =============================================================================

pub async fn list_sizes(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
) -> Result<Json<Vec<Size>>, ApiError> {
    Ok(Json(state.db.catalog().list_sizes(user.id().as_str()).await?))
}

pub async fn create_size(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Json(body): Json<NameRequest>,
) -> Result<(StatusCode, Json<Size>), ApiError> {
    validate_catalog_name("name", &body.name)?;

    let size = state
        .db
        .catalog()
        .create_size(user.id().as_str(), &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(size)))
}

pub async fn get_size(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<Json<Size>, ApiError> {
    state
        .db
        .catalog()
        .get_size(&id, user.id().as_str())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Size", &id))
}

pub async fn update_size(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
    Json(body): Json<NameRequest>,
) -> Result<Json<Size>, ApiError> {
    validate_catalog_name("name", &body.name)?;

    let size = state
        .db
        .catalog()
        .update_size(&id, user.id().as_str(), &body.name)
        .await?;
    Ok(Json(size))
}

pub async fn delete_size(
    State(state): State<AppState>,
    Extension(user): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .db
        .catalog()
        .delete_size(&id, user.id().as_str())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
