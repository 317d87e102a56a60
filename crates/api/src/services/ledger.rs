//! Stock reservation.
//!
//! The ledger is the only writer of stock during checkout. A successful
//! [`InventoryLedger::reserve`] returns a [`Reservation`]; handing it back to
//! [`InventoryLedger::release`] restores exactly what was taken. Because
//! `release` consumes the reservation, a reservation can be given back at
//! most once.

use async_trait::async_trait;
use thiserror::Error;

use kasir_core::{CartLine, ProductId};

/// Errors from reserving or releasing stock.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
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

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Proof that stock was taken for a set of lines.
///
/// Dropping a reservation keeps the stock decremented; that is the normal
/// outcome once the sale is recorded.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reservation must be kept or released"]
pub struct Reservation {
    lines: Vec<CartLine>,
}

impl Reservation {
    /// Record that `lines` were reserved. Called by ledger implementations.
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Lines that were reserved.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the reservation, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }
}

/// Stock bookkeeping with all-or-nothing reservation.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Decrement stock for every line, or for none.
    ///
    /// Lines are checked in order; the first failing line is reported. No
    /// other reserve sharing a product can interleave between the check and
    /// the decrement.
    async fn reserve(&self, lines: &[CartLine]) -> Result<Reservation, LedgerError>;

    /// Give back the stock held by `reservation`.
    ///
    /// Products deleted since the reservation are skipped.
    async fn release(&self, reservation: Reservation) -> Result<(), LedgerError>;
}
