//! Product and category storage.

use async_trait::async_trait;

use kasir_core::{CategoryId, ProductId};

use crate::db::RepositoryError;
use crate::models::{Category, CategoryInput, Product, ProductFilter, ProductInput};

/// Catalog storage. Inputs are validated before they reach an implementation.
/// `update_product` sets stock to an absolute value, like a stock-take.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Products matching `filter`, ordered by id.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    /// One product, if it exists.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Every product in `ids` that exists. Missing ids are skipped.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Insert a product.
    ///
    /// Fails with `InvalidReference` when the category does not exist.
    async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError>;

    /// Replace a product's fields. `None` when the product does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Delete a product. `false` when it did not exist.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// All categories, ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// One category, if it exists.
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;

    /// Insert a category.
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, RepositoryError>;

    /// Replace a category's fields. `None` when the category does not exist.
    async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError>;

    /// Delete a category; its products become uncategorized.
    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError>;

    /// Check that the backing store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
