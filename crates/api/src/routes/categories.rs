//! Category route handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use tracing::instrument;

use kasir_core::CategoryId;

use crate::error::{AppError, Result};
use crate::models::{Category, CategoryInput};
use crate::state::AppState;

/// List categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().list_categories().await?))
}

/// Fetch one category.
#[instrument(skip(state, id))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Category>> {
    let Path(id) = id?;
    let id = CategoryId::new(id);
    state
        .catalog()
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}

/// Create a category.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>)> {
    let Json(input) = body?;
    let category = state.catalog().create_category(&input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category.
#[instrument(skip(state, id, body))]
pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
    body: std::result::Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let id = CategoryId::new(id);
    state
        .catalog()
        .update_category(id, &input.validate()?)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}

/// Delete a category; its products become uncategorized.
#[instrument(skip(state, id))]
pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    let id = CategoryId::new(id);
    if state.catalog().delete_category(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("category {id}")))
    }
}
