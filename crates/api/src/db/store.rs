//! `PostgreSQL` implementation of the storage seams.

use async_trait::async_trait;
use sqlx::PgPool;

use kasir_core::{CartLine, CategoryId, ProductId, TimeRange, TransactionId};

use super::{
    CategoryRepository, InventoryRepository, ProductRepository, RepositoryError,
    TransactionRepository,
};
use crate::models::{
    Category, CategoryInput, NewTransaction, Product, ProductFilter, ProductInput, Transaction,
};
use crate::services::{
    Catalog, InventoryLedger, JournalError, LedgerError, Reservation, TransactionJournal,
};

/// Catalog, ledger and journal backed by one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PgStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list(filter).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get(id).await
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_many(ids).await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(input).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).update(id, input).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(&self.pool).delete(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).list().await
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).get(id).await
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool).create(input).await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).update(id, input).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        CategoryRepository::new(&self.pool).delete(id).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryLedger for PgStore {
    async fn reserve(&self, lines: &[CartLine]) -> Result<Reservation, LedgerError> {
        InventoryRepository::new(&self.pool).reserve(lines).await
    }

    async fn release(&self, reservation: Reservation) -> Result<(), LedgerError> {
        InventoryRepository::new(&self.pool).release(reservation).await
    }
}

#[async_trait]
impl TransactionJournal for PgStore {
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, JournalError> {
        TransactionRepository::new(&self.pool).append(transaction).await
    }

    async fn scan(&self, range: TimeRange) -> Result<Vec<Transaction>, JournalError> {
        TransactionRepository::new(&self.pool).scan(range).await
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, JournalError> {
        TransactionRepository::new(&self.pool).get(id).await
    }
}
