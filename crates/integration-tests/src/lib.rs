//! Integration tests for Kasir.
//!
//! # Running Tests
//!
//! ```bash
//! # Database-backed tests (migrations are applied automatically)
//! KASIR_TEST_DATABASE_URL=postgres://localhost/kasir_test \
//!     cargo test -p kasir-integration-tests -- --ignored --test-threads=1
//!
//! # HTTP smoke tests against a running server
//! KASIR_BASE_URL=http://localhost:8080 \
//!     cargo test -p kasir-integration-tests --test http_smoke -- --ignored
//! ```
//!
//! Database tests truncate every `pos` table, so point them at a
//! throwaway database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::PgPool;

use kasir_api::db::{self, PgStore};
use kasir_api::models::{Product, ProductInput};
use kasir_api::services::Catalog;
use kasir_core::Money;

/// Database fixture shared by the `PostgreSQL` tests.
pub struct TestContext {
    pub store: Arc<PgStore>,
}

impl TestContext {
    /// Connect, migrate and empty the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if `KASIR_TEST_DATABASE_URL` is unset or the
    /// database cannot be prepared.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let url = std::env::var("KASIR_TEST_DATABASE_URL")?;
        let pool = db::create_pool(&SecretString::from(url), 16).await?;

        sqlx::migrate!("../api/migrations").run(&pool).await?;
        sqlx::query(
            "TRUNCATE pos.sale_transaction_item, pos.sale_transaction, pos.product, pos.category
             RESTART IDENTITY CASCADE",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            store: Arc::new(PgStore::new(pool)),
        })
    }

    /// Pool behind the store, for direct SQL.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.store.pool()
    }

    /// Insert a product with the given price (minor units) and stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is negative or the insert fails.
    pub async fn product(
        &self,
        name: &str,
        price: i64,
        stock: i32,
    ) -> Result<Product, Box<dyn std::error::Error>> {
        let input = ProductInput {
            name: name.to_string(),
            price: Money::from_minor(price)?,
            stock,
            category_id: None,
        };
        Ok(self.store.create_product(&input).await?)
    }

    /// Read the current stock of a product straight from the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn stock_of(&self, product: &Product) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar("SELECT stock FROM pos.product WHERE id = $1")
            .bind(product.id.as_i32())
            .fetch_one(self.pool())
            .await
    }
}

/// Base URL of a running server for HTTP smoke tests.
#[must_use]
pub fn base_url() -> String {
    std::env::var("KASIR_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}
