//! Domain models for the point-of-sale service.
//!
//! These types are what handlers serialize and services pass around. Database
//! row types live next to the queries in [`crate::db`].

pub mod category;
pub mod product;
pub mod report;
pub mod transaction;

pub use category::{Category, CategoryInput};
pub use product::{Product, ProductFilter, ProductInput};
pub use report::{ProductSales, Report};
pub use transaction::{NewTransaction, Transaction, TransactionItem};

/// Input validation failures for catalog writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required name was blank.
    #[error("name cannot be empty")]
    EmptyName,
    /// Stock must be zero or more.
    #[error("stock cannot be negative (got {0})")]
    NegativeStock(i32),
}

/// Trim a name field, rejecting blank values.
fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
