//! In-process store backing every storage seam.
//!
//! One mutex guards products, categories and sales together, so a reserve
//! checks and decrements stock without any other operation in between.
//! Data lives only as long as the process; use it for tests and demos.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use kasir_core::{CartLine, CategoryId, ProductId, TimeRange, TransactionId};

use super::catalog::Catalog;
use super::journal::{JournalError, TransactionJournal};
use super::ledger::{InventoryLedger, LedgerError, Reservation};
use crate::db::RepositoryError;
use crate::models::{
    Category, CategoryInput, NewTransaction, Product, ProductFilter, ProductInput, Transaction,
};

#[derive(Debug, Default)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    transactions: BTreeMap<TransactionId, Transaction>,
    last_product_id: i32,
    last_category_id: i32,
    last_transaction_id: i32,
}

impl MemoryState {
    fn check_category(&self, category_id: Option<CategoryId>) -> Result<(), RepositoryError> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(
                RepositoryError::InvalidReference(format!("category {id} does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

/// Catalog, inventory ledger and transaction journal held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current stock of a product, if it exists.
    #[must_use]
    pub fn stock_of(&self, id: ProductId) -> Option<i32> {
        self.lock().products.get(&id).map(|p| p.stock)
    }

    /// Number of recorded sales.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.lock().transactions.len()
    }
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut state = self.lock();
        state.check_category(input.category_id)?;

        state.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(state.last_product_id),
            name: input.name.clone(),
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut state = self.lock();
        state.check_category(input.category_id)?;

        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        product.name.clone_from(&input.name);
        product.price = input.price;
        product.stock = input.stock;
        product.category_id = input.category_id;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.lock().products.remove(&id).is_some())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.lock().categories.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let mut state = self.lock();
        state.last_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(state.last_category_id),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut state = self.lock();
        let Some(category) = state.categories.get_mut(&id) else {
            return Ok(None);
        };
        category.name.clone_from(&input.name);
        category.description.clone_from(&input.description);
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl InventoryLedger for InMemoryStore {
    async fn reserve(&self, lines: &[CartLine]) -> Result<Reservation, LedgerError> {
        let mut state = self.lock();

        for line in lines {
            let product = state
                .products
                .get(&line.product_id)
                .ok_or(LedgerError::ProductNotFound(line.product_id))?;
            if product.stock < line.quantity.get() {
                return Err(LedgerError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity.get(),
                    available: product.stock,
                });
            }
        }

        let now = Utc::now();
        for line in lines {
            if let Some(product) = state.products.get_mut(&line.product_id) {
                product.stock -= line.quantity.get();
                product.updated_at = now;
            }
        }

        Ok(Reservation::new(lines.to_vec()))
    }

    async fn release(&self, reservation: Reservation) -> Result<(), LedgerError> {
        let mut state = self.lock();
        let now = Utc::now();
        for line in reservation.into_lines() {
            match state.products.get_mut(&line.product_id) {
                Some(product) => {
                    product.stock = product.stock.saturating_add(line.quantity.get());
                    product.updated_at = now;
                }
                None => tracing::warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity.get(),
                    "Released stock for a deleted product"
                ),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionJournal for InMemoryStore {
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, JournalError> {
        let mut state = self.lock();
        state.last_transaction_id += 1;
        let stored = transaction.into_transaction(TransactionId::new(state.last_transaction_id));
        state.transactions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn scan(&self, range: TimeRange) -> Result<Vec<Transaction>, JournalError> {
        Ok(self
            .lock()
            .transactions
            .values()
            .filter(|t| range.contains(t.created_at))
            .cloned()
            .collect())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, JournalError> {
        Ok(self.lock().transactions.get(&id).cloned())
    }
}
