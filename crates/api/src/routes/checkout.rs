//! Checkout handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use kasir_core::{Cart, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::models::Transaction;
use crate::services::CheckoutError;
use crate::state::AppState;

/// One requested line. Quantity is validated after parsing so that zero and
/// negative values get a precise error.
#[derive(Debug, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Checkout body: `{"items": [...]}` or a bare array of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CheckoutRequest {
    Wrapped { items: Vec<CheckoutLine> },
    Bare(Vec<CheckoutLine>),
}

impl CheckoutRequest {
    fn into_lines(self) -> Vec<CheckoutLine> {
        match self {
            Self::Wrapped { items } | Self::Bare(items) => items,
        }
    }
}

/// Validate the cart, reserve stock and record the sale.
///
/// Responds 201 with the recorded transaction.
#[instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<AppState>,
    body: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let Json(request) = body?;
    let cart = Cart::parse(
        request
            .into_lines()
            .into_iter()
            .map(|line| (line.product_id, line.quantity)),
    )
    .map_err(CheckoutError::from)?;

    add_breadcrumb(
        "checkout",
        "Checkout started",
        &[("lines", json!(cart.lines().len()))],
    );

    let transaction = state.checkout().checkout(&cart).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
