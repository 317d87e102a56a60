//! Stock reservation against `pos.product`.
//!
//! A reserve runs in one database transaction: lock every cart row with
//! `SELECT ... FOR UPDATE` in id order, check stock in cart order, then
//! decrement all rows in a single statement. Reserve and release both lock
//! in id order, so overlapping carts never deadlock. The `stock >= 0` check
//! constraint is the last line of defence against overselling.

use std::collections::HashMap;

use sqlx::PgPool;

use kasir_core::{CartLine, ProductId};

use crate::services::ledger::{LedgerError, Reservation};

/// Repository for stock movements.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Decrement stock for every line, or for none.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ProductNotFound` or `LedgerError::InsufficientStock`
    /// for the first failing line, `LedgerError::Storage` if a query fails.
    pub async fn reserve(&self, lines: &[CartLine]) -> Result<Reservation, LedgerError> {
        let (ids, quantities) = split_lines(lines);
        let mut tx = self.pool.begin().await?;

        let rows: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT id, stock FROM pos.product
             WHERE id = ANY($1)
             ORDER BY id
             FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;
        let stock: HashMap<ProductId, i32> = rows
            .into_iter()
            .map(|(id, stock)| (ProductId::new(id), stock))
            .collect();

        // Dropping `tx` on an early return rolls back and releases the locks.
        check_stock(lines, &stock)?;

        sqlx::query(
            "UPDATE pos.product AS p
             SET stock = p.stock - l.quantity, updated_at = NOW()
             FROM UNNEST($1::int4[], $2::int4[]) AS l(id, quantity)
             WHERE p.id = l.id",
        )
        .bind(&ids)
        .bind(&quantities)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Reservation::new(lines.to_vec()))
    }

    /// Give back the stock held by `reservation`.
    ///
    /// Rows are locked in id order first, like `reserve`, so a release never
    /// deadlocks against an overlapping reservation.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if a query fails.
    pub async fn release(&self, reservation: Reservation) -> Result<(), LedgerError> {
        let (ids, quantities) = split_lines(reservation.lines());
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM pos.product WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE pos.product AS p
             SET stock = p.stock + l.quantity, updated_at = NOW()
             FROM UNNEST($1::int4[], $2::int4[]) AS l(id, quantity)
             WHERE p.id = l.id",
        )
        .bind(&ids)
        .bind(&quantities)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let released = usize::try_from(result.rows_affected()).unwrap_or(usize::MAX);
        if released < ids.len() {
            tracing::warn!(
                expected = ids.len(),
                released,
                "Released stock for fewer products than reserved; some were deleted"
            );
        }

        Ok(())
    }
}

fn split_lines(lines: &[CartLine]) -> (Vec<i32>, Vec<i32>) {
    lines
        .iter()
        .map(|line| (line.product_id.as_i32(), line.quantity.get()))
        .unzip()
}

/// Check locked stock levels in cart order.
fn check_stock(lines: &[CartLine], stock: &HashMap<ProductId, i32>) -> Result<(), LedgerError> {
    for line in lines {
        let available = *stock
            .get(&line.product_id)
            .ok_or(LedgerError::ProductNotFound(line.product_id))?;
        if available < line.quantity.get() {
            return Err(LedgerError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity.get(),
                available,
            });
        }
    }
    Ok(())
}
