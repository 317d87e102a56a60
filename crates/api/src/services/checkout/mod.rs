//! Checkout processing.
//!
//! A checkout is a two-step saga over separate stores:
//!
//! 1. reserve stock for every line through the [`InventoryLedger`]
//! 2. append the sale to the [`TransactionJournal`]
//!
//! If step 2 fails the reservation is released, so a failed checkout leaves
//! stock as it found it. Between the steps other requests can observe the
//! reduced stock; they can never observe a recorded sale without its stock
//! movement.

mod error;

pub use error::CheckoutError;

use std::collections::HashMap;

use tracing::instrument;

use kasir_core::{Cart, Money, ProductId};

use super::catalog::Catalog;
use super::clock::Clock;
use super::journal::TransactionJournal;
use super::ledger::InventoryLedger;
use crate::models::{NewTransaction, Product, Transaction, TransactionItem};

/// Turns a validated cart into a recorded sale.
pub struct CheckoutProcessor<'a> {
    catalog: &'a dyn Catalog,
    ledger: &'a dyn InventoryLedger,
    journal: &'a dyn TransactionJournal,
    clock: &'a dyn Clock,
}

impl<'a> CheckoutProcessor<'a> {
    /// Create a new checkout processor.
    #[must_use]
    pub const fn new(
        catalog: &'a dyn Catalog,
        ledger: &'a dyn InventoryLedger,
        journal: &'a dyn TransactionJournal,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            catalog,
            ledger,
            journal,
            clock,
        }
    }

    /// Reserve stock for `cart` and record the sale.
    ///
    /// Line names and unit prices are snapshotted from the catalog before
    /// stock is reserved.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` / `InsufficientStock` for the first failing line
    ///   in cart order; stock is untouched
    /// - `AmountTooLarge` if the total overflows; stock is untouched
    /// - `Unavailable` if the catalog or ledger cannot be reached
    /// - `PersistenceFailure` if the sale could not be recorded; stock has
    ///   been released
    #[instrument(skip(self, cart), fields(lines = cart.lines().len()))]
    pub async fn checkout(&self, cart: &Cart) -> Result<Transaction, CheckoutError> {
        let ids: Vec<ProductId> = cart.product_ids().collect();
        let products: HashMap<ProductId, Product> = self
            .catalog
            .get_products(&ids)
            .await
            .map_err(|e| CheckoutError::Unavailable(e.to_string()))?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let (items, total) = price_lines(cart, &products)?;

        let reservation = self.ledger.reserve(cart.lines()).await?;

        let sale = NewTransaction {
            created_at: self.clock.now(),
            total,
            items,
        };

        match self.journal.append(sale).await {
            Ok(transaction) => {
                tracing::info!(
                    transaction_id = %transaction.id,
                    total = %transaction.total,
                    "Checkout completed"
                );
                Ok(transaction)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Recording sale failed, releasing reserved stock");
                if let Err(release_err) = self.ledger.release(reservation).await {
                    let event_id = sentry::capture_error(&release_err);
                    tracing::error!(
                        error = %release_err,
                        sentry_event_id = %event_id,
                        "Releasing reserved stock failed; stock is stranded"
                    );
                }
                Err(CheckoutError::PersistenceFailure(err.to_string()))
            }
        }
    }
}

/// Snapshot each line against the catalog, in cart order.
///
/// Stock here is advisory: it rejects carts that cannot succeed without
/// touching the ledger. The ledger makes the binding check.
fn price_lines(
    cart: &Cart,
    products: &HashMap<ProductId, Product>,
) -> Result<(Vec<TransactionItem>, Money), CheckoutError> {
    let mut items = Vec::with_capacity(cart.lines().len());
    let mut total = Money::ZERO;

    for line in cart.lines() {
        let product = products
            .get(&line.product_id)
            .ok_or(CheckoutError::ProductNotFound(line.product_id))?;
        let requested = line.quantity.get();
        if product.stock < requested {
            return Err(CheckoutError::InsufficientStock {
                product_id: product.id,
                requested,
                available: product.stock,
            });
        }

        let subtotal = product
            .price
            .checked_mul(requested)
            .map_err(|_| CheckoutError::AmountTooLarge)?;
        total = total
            .checked_add(subtotal)
            .map_err(|_| CheckoutError::AmountTooLarge)?;

        items.push(TransactionItem {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: requested,
            unit_price: product.price,
            subtotal,
        });
    }

    Ok((items, total))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use kasir_core::{CartLine, TimeRange, TransactionId};

    use super::*;
    use crate::models::ProductInput;
    use crate::services::clock::ManualClock;
    use crate::services::journal::JournalError;
    use crate::services::ledger::{LedgerError, Reservation};
    use crate::services::memory::InMemoryStore;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 10, 30, 0).unwrap())
    }

    async fn seed(store: &InMemoryStore, name: &str, price: i64, stock: i32) -> Product {
        store
            .create_product(&ProductInput {
                name: name.to_string(),
                price: Money::from_minor(price).unwrap(),
                stock,
                category_id: None,
            })
            .await
            .unwrap()
    }

    /// Journal whose appends always fail.
    struct BrokenJournal;

    #[async_trait]
    impl TransactionJournal for BrokenJournal {
        async fn append(&self, _: NewTransaction) -> Result<Transaction, JournalError> {
            Err(JournalError::Storage("disk full".to_string()))
        }

        async fn scan(&self, _: TimeRange) -> Result<Vec<Transaction>, JournalError> {
            Ok(Vec::new())
        }

        async fn get(&self, _: TransactionId) -> Result<Option<Transaction>, JournalError> {
            Ok(None)
        }
    }

    /// Ledger that reserves through the store but cannot release.
    struct StuckLedger<'a>(&'a InMemoryStore);

    #[async_trait]
    impl InventoryLedger for StuckLedger<'_> {
        async fn reserve(&self, lines: &[CartLine]) -> Result<Reservation, LedgerError> {
            self.0.reserve(lines).await
        }

        async fn release(&self, _: Reservation) -> Result<(), LedgerError> {
            Err(LedgerError::Storage("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_checkout_records_sale_and_decrements_stock() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 10).await;
        let teh = seed(&store, "Teh", 500, 10).await;

        let cart = Cart::parse([(kopi.id, 2), (teh.id, 1)]).unwrap();
        let transaction = CheckoutProcessor::new(&store, &store, &store, &clock)
            .checkout(&cart)
            .await
            .unwrap();

        assert_eq!(transaction.total, Money::from_minor(2500).unwrap());
        assert_eq!(transaction.created_at, clock.now());
        assert_eq!(transaction.items.len(), 2);
        assert_eq!(transaction.items[0].product_name, "Kopi");
        assert_eq!(transaction.items[0].subtotal, Money::from_minor(2000).unwrap());
        assert_eq!(store.stock_of(kopi.id), Some(8));
        assert_eq!(store.stock_of(teh.id), Some(9));
    }

    #[tokio::test]
    async fn test_missing_product_leaves_stock_untouched() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 10).await;

        let cart = Cart::parse([(kopi.id, 1), (ProductId::new(99), 1)]).unwrap();
        let err = CheckoutProcessor::new(&store, &store, &store, &clock)
            .checkout(&cart)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound(id) if id == ProductId::new(99)));
        assert_eq!(store.stock_of(kopi.id), Some(10));
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_reports_first_failing_line() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 1).await;
        let teh = seed(&store, "Teh", 500, 0).await;

        let cart = Cart::parse([(kopi.id, 2), (teh.id, 1)]).unwrap();
        let err = CheckoutProcessor::new(&store, &store, &store, &clock)
            .checkout(&cart)
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                product_id,
                requested,
                available,
            } => {
                assert_eq!(product_id, kopi.id);
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.stock_of(kopi.id), Some(1));
    }

    #[tokio::test]
    async fn test_persistence_failure_releases_stock() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 5).await;

        let cart = Cart::parse([(kopi.id, 3)]).unwrap();
        let err = CheckoutProcessor::new(&store, &store, &BrokenJournal, &clock)
            .checkout(&cart)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PersistenceFailure(_)));
        assert_eq!(store.stock_of(kopi.id), Some(5));
    }

    #[tokio::test]
    async fn test_failed_release_still_reports_persistence_failure() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 5).await;
        let ledger = StuckLedger(&store);

        let cart = Cart::parse([(kopi.id, 3)]).unwrap();
        let err = CheckoutProcessor::new(&store, &ledger, &BrokenJournal, &clock)
            .checkout(&cart)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PersistenceFailure(_)));
        assert_eq!(store.stock_of(kopi.id), Some(2));
    }

    #[tokio::test]
    async fn test_total_overflow_rejected_before_reserving() {
        let store = InMemoryStore::new();
        let clock = clock();
        let gold = seed(&store, "Emas", i64::MAX / 2, 10).await;

        let cart = Cart::parse([(gold.id, 3)]).unwrap();
        let err = CheckoutProcessor::new(&store, &store, &store, &clock)
            .checkout(&cart)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::AmountTooLarge));
        assert_eq!(store.stock_of(gold.id), Some(10));
    }

    #[tokio::test]
    async fn test_price_change_does_not_rewrite_history() {
        let store = InMemoryStore::new();
        let clock = clock();
        let kopi = seed(&store, "Kopi", 1000, 10).await;

        let cart = Cart::parse([(kopi.id, 2)]).unwrap();
        let sale = CheckoutProcessor::new(&store, &store, &store, &clock)
            .checkout(&cart)
            .await
            .unwrap();

        store
            .update_product(
                kopi.id,
                &ProductInput {
                    name: "Kopi Premium".to_string(),
                    price: Money::from_minor(5000).unwrap(),
                    stock: 8,
                    category_id: None,
                },
            )
            .await
            .unwrap();

        let stored = store.get(sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total, Money::from_minor(2000).unwrap());
        assert_eq!(stored.items[0].product_name, "Kopi");
        assert_eq!(stored.items[0].unit_price, Money::from_minor(1000).unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_never_oversell() {
        let store = Arc::new(InMemoryStore::new());
        let kopi = seed(&store, "Kopi", 1000, 5).await;

        let attempts: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let clock = clock();
                    let cart = Cart::parse([(kopi.id, 3)]).unwrap();
                    CheckoutProcessor::new(&*store, &*store, &*store, &clock)
                        .checkout(&cart)
                        .await
                })
            })
            .collect();

        let mut completed = 0;
        let mut rejected = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => completed += 1,
                Err(CheckoutError::InsufficientStock { available, .. }) => {
                    assert_eq!(available, 2);
                    rejected += 1;
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!((completed, rejected), (1, 1));
        assert_eq!(store.stock_of(kopi.id), Some(2));
        assert_eq!(store.transaction_count(), 1);
    }
}
