//! Database operations for the sales journal.
//!
//! A sale is one `pos.sale_transaction` row plus its `pos.sale_transaction_item`
//! rows, written in a single database transaction so readers see all of it
//! or none of it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use kasir_core::{Money, ProductId, TimeRange, TransactionId};

use crate::models::{NewTransaction, Transaction, TransactionItem};
use crate::services::journal::JournalError;

/// Internal row type: one item joined with its transaction header.
#[derive(Debug, sqlx::FromRow)]
struct TransactionItemRow {
    transaction_id: i32,
    created_at: DateTime<Utc>,
    total: Money,
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Money,
    subtotal: Money,
}

const SELECT_ITEMS: &str = "
    SELECT t.id AS transaction_id, t.created_at, t.total,
           i.product_id, i.product_name, i.quantity, i.unit_price, i.subtotal
    FROM pos.sale_transaction t
    JOIN pos.sale_transaction_item i ON i.transaction_id = t.id";

/// Repository for the append-only sales journal.
pub struct TransactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a sale and its items atomically.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Storage` if any insert fails; nothing is stored.
    pub async fn append(&self, sale: NewTransaction) -> Result<Transaction, JournalError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO pos.sale_transaction (created_at, total)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(sale.created_at)
        .bind(sale.total)
        .fetch_one(&mut *tx)
        .await?;

        let line_count = i32::try_from(sale.items.len())
            .map_err(|_| JournalError::Storage("too many items".to_string()))?;
        let line_numbers: Vec<i32> = (0..line_count).collect();
        let product_ids: Vec<i32> = sale.items.iter().map(|i| i.product_id.as_i32()).collect();
        let names: Vec<&str> = sale.items.iter().map(|i| i.product_name.as_str()).collect();
        let quantities: Vec<i32> = sale.items.iter().map(|i| i.quantity).collect();
        let unit_prices: Vec<i64> = sale.items.iter().map(|i| i.unit_price.as_i64()).collect();
        let subtotals: Vec<i64> = sale.items.iter().map(|i| i.subtotal.as_i64()).collect();

        sqlx::query(
            "INSERT INTO pos.sale_transaction_item
                (transaction_id, line_no, product_id, product_name, quantity, unit_price, subtotal)
             SELECT $1, item.*
             FROM UNNEST($2::int4[], $3::int4[], $4::text[], $5::int4[], $6::int8[], $7::int8[])
                AS item(line_no, product_id, product_name, quantity, unit_price, subtotal)",
        )
        .bind(id)
        .bind(&line_numbers)
        .bind(&product_ids)
        .bind(&names)
        .bind(&quantities)
        .bind(&unit_prices)
        .bind(&subtotals)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(sale.into_transaction(TransactionId::new(id)))
    }

    /// Sales created inside `range`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Storage` if the query fails.
    pub async fn scan(&self, range: TimeRange) -> Result<Vec<Transaction>, JournalError> {
        let rows = sqlx::query_as::<_, TransactionItemRow>(&format!(
            "{SELECT_ITEMS}
             WHERE t.created_at >= $1 AND t.created_at < $2
             ORDER BY t.id, i.line_no"
        ))
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.pool)
        .await?;

        Ok(group_rows(rows))
    }

    /// One sale by id.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Storage` if the query fails.
    pub async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, JournalError> {
        let rows = sqlx::query_as::<_, TransactionItemRow>(&format!(
            "{SELECT_ITEMS}
             WHERE t.id = $1
             ORDER BY i.line_no"
        ))
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(group_rows(rows).into_iter().next())
    }
}

/// Fold item rows, sorted by transaction id, into transactions.
fn group_rows(rows: Vec<TransactionItemRow>) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = Vec::new();

    for row in rows {
        let id = TransactionId::new(row.transaction_id);
        let item = TransactionItem {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
        };

        match transactions.last_mut() {
            Some(current) if current.id == id => current.items.push(item),
            _ => transactions.push(Transaction {
                id,
                created_at: row.created_at,
                total: row.total,
                items: vec![item],
            }),
        }
    }

    transactions
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(transaction_id: i32, product_id: i32, quantity: i32) -> TransactionItemRow {
        TransactionItemRow {
            transaction_id,
            created_at: Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap(),
            total: Money::from_minor(1000).unwrap(),
            product_id,
            product_name: format!("product-{product_id}"),
            quantity,
            unit_price: Money::from_minor(100).unwrap(),
            subtotal: Money::from_minor(100 * i64::from(quantity)).unwrap(),
        }
    }

    #[test]
    fn test_group_rows_splits_by_transaction() {
        let grouped = group_rows(vec![row(1, 10, 2), row(1, 11, 3), row(2, 10, 5)]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].id, TransactionId::new(1));
        assert_eq!(grouped[0].items.len(), 2);
        assert_eq!(grouped[0].items[1].product_id, ProductId::new(11));
        assert_eq!(grouped[1].items.len(), 1);
    }

    #[test]
    fn test_group_rows_empty() {
        assert!(group_rows(Vec::new()).is_empty());
    }
}
