//! Sales ledger types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kasir_core::{Money, ProductId, TransactionId};

/// One line of a completed sale.
///
/// Name and unit price are copied from the product at checkout time, so later
/// catalog edits never change historical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Money,
    /// `unit_price * quantity`
    pub subtotal: Money,
}

/// A completed sale as stored in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub created_at: DateTime<Utc>,
    /// Sum of item subtotals.
    pub total: Money,
    /// Items in cart order.
    pub items: Vec<TransactionItem>,
}

/// A sale that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub created_at: DateTime<Utc>,
    pub total: Money,
    pub items: Vec<TransactionItem>,
}

impl NewTransaction {
    /// Attach the id assigned by the journal.
    #[must_use]
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            created_at: self.created_at,
            total: self.total,
            items: self.items,
        }
    }
}
