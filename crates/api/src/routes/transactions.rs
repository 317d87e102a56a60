//! Recorded sale lookup.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use tracing::instrument;

use kasir_core::TransactionId;

use crate::error::{AppError, Result};
use crate::models::Transaction;
use crate::state::AppState;

/// Fetch one recorded sale with its items.
#[instrument(skip(state, id))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Transaction>> {
    let Path(id) = id?;
    let id = TransactionId::new(id);
    state
        .journal()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))
}
