//! Checkout error types.

use thiserror::Error;

use kasir_core::{CartError, ProductId};

use crate::services::ledger::LedgerError;

/// Errors that can occur while processing a checkout.
///
/// Every variant except `PersistenceFailure` means stock was never touched.
/// `PersistenceFailure` means stock was taken and then given back.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Malformed cart (empty, bad quantity, duplicate product, too many lines).
    #[error("invalid cart: {0}")]
    InvalidCart(#[from] CartError),

    /// Line subtotals or the cart total do not fit the money type.
    #[error("invalid cart: total amount is too large")]
    AmountTooLarge,

    /// A line names a product that does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A line asks for more units than are on hand.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },

    /// The catalog or ledger could not be reached before anything changed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stock was reserved but the sale could not be recorded.
    #[error("failed to record transaction: {0}")]
    PersistenceFailure(String),
}

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ProductNotFound(id) => Self::ProductNotFound(id),
            LedgerError::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            LedgerError::Storage(msg) => Self::Unavailable(msg),
        }
    }
}
