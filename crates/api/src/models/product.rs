//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasir_core::{CategoryId, Money, ProductId};

use super::{ValidationError, normalize_name};

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price in the smallest currency unit.
    pub price: Money,
    /// Units on hand. Never negative.
    pub stock: i32,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last changed (edit or stock movement).
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    /// Trim the name and check field invariants.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank name or negative stock.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.stock < 0 {
            return Err(ValidationError::NegativeStock(self.stock));
        }
        Ok(Self {
            name: normalize_name(&self.name)?,
            ..self
        })
    }
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    /// Only products in this category.
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = self.name.as_deref().is_none_or(|needle| {
            product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let category_ok = self
            .category_id
            .is_none_or(|id| product.category_id == Some(id));
        name_ok && category_ok
    }
}
