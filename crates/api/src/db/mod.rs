//! `PostgreSQL` persistence.
//!
//! # Schema: `pos`
//!
//! ## Tables
//!
//! - `category` - Product groupings
//! - `product` - Catalog items with current price and stock (`stock >= 0`)
//! - `sale_transaction` - Completed sales (append-only)
//! - `sale_transaction_item` - Line snapshots of name, unit price and subtotal
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p kasir-cli -- migrate
//! ```

pub mod categories;
pub mod inventory;
pub mod products;
pub mod store;
pub mod transactions;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use inventory::InventoryRepository;
pub use products::ProductRepository;
pub use store::PgStore;
pub use transactions::TransactionRepository;

/// Errors that can occur during catalog repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced entity does not exist (e.g. unknown category).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a foreign-key violation to `InvalidReference`, anything else to `Database`.
fn map_reference_error(err: sqlx::Error, what: impl FnOnce() -> String) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::InvalidReference(what());
    }
    RepositoryError::Database(err)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
