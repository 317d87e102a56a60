//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (store reachable)
//!
//! # Checkout
//! POST   /api/checkout            - Reserve stock and record a sale
//!
//! # Reports
//! GET    /api/report              - Report over ?start=&end= (default: today)
//! GET    /api/report/today        - Report over the current day
//!
//! # Transactions
//! GET    /api/transactions/{id}   - One recorded sale
//!
//! # Catalog
//! GET    /api/products            - List (?name=, ?category_id=)
//! POST   /api/products            - Create
//! GET    /api/products/{id}       - Fetch
//! PUT    /api/products/{id}       - Replace
//! DELETE /api/products/{id}       - Delete
//! GET    /api/categories          - List
//! POST   /api/categories          - Create
//! GET    /api/categories/{id}     - Fetch
//! PUT    /api/categories/{id}     - Replace
//! DELETE /api/categories/{id}     - Delete
//!
//! # Legacy aliases
//! /api/produk/...                 - Same as /api/products/...
//! /api/kategori/...               - Same as /api/categories/...
//! GET    /api/report/hari-ini     - Same as /api/report/today
//! ```

pub mod categories;
pub mod checkout;
pub mod health;
pub mod products;
pub mod reports;
pub mod transactions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::range))
        .route("/today", get(reports::today))
        .route("/hari-ini", get(reports::today))
}

/// Create all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::checkout))
        .nest("/report", report_routes())
        .route("/transactions/{id}", get(transactions::show))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        // Legacy Indonesian paths used by existing POS clients
        .nest("/produk", product_routes())
        .nest("/kategori", category_routes())
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
