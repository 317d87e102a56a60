//! Product route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::instrument;

use kasir_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{Product, ProductFilter, ProductInput};
use crate::state::AppState;

/// List products, optionally filtered by name substring or category.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductFilter>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(filter) = query?;
    let products = state.catalog().list_products(&filter).await?;
    Ok(Json(products))
}

/// Fetch one product.
#[instrument(skip(state, id))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let id = ProductId::new(id);
    state
        .catalog()
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(input) = body?;
    let input = input.validate()?;
    let product = state.catalog().create_product(&input).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product, including its stock level.
#[instrument(skip(state, id, body))]
pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
    body: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let id = ProductId::new(id);
    let input = input.validate()?;
    state
        .catalog()
        .update_product(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Delete a product. Recorded sales are unaffected.
#[instrument(skip(state, id))]
pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    let id = ProductId::new(id);
    if state.catalog().delete_product(id).await? {
        tracing::info!(product_id = %id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}
