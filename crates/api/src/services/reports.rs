//! Sales reporting over time ranges.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use thiserror::Error;
use tracing::instrument;

use kasir_core::{Money, MoneyError, ProductId, RangeError, TimeRange};

use super::clock::Clock;
use super::journal::{JournalError, TransactionJournal};
use crate::models::{ProductSales, Report, Transaction};

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested range is unusable.
    #[error("invalid range: {0}")]
    InvalidRange(#[from] RangeError),

    /// The journal could not be read.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    /// Revenue exceeded the money type.
    #[error("revenue overflow: {0}")]
    Overflow(#[from] MoneyError),
}

/// Builds reports from the transaction journal.
pub struct ReportAggregator<'a> {
    journal: &'a dyn TransactionJournal,
    clock: &'a dyn Clock,
    timezone: Tz,
}

impl<'a> ReportAggregator<'a> {
    /// Create a report aggregator. `timezone` defines calendar days.
    #[must_use]
    pub const fn new(journal: &'a dyn TransactionJournal, clock: &'a dyn Clock, timezone: Tz) -> Self {
        Self {
            journal,
            clock,
            timezone,
        }
    }

    /// Report over `range`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Journal` if the journal cannot be scanned.
    #[instrument(skip(self), fields(start = %range.start(), end = %range.end()))]
    pub async fn report(&self, range: TimeRange, breakdown: bool) -> Result<Report, ReportError> {
        let transactions = self.journal.scan(range).await?;
        aggregate(range, self.timezone, &transactions, breakdown)
    }

    /// Report over the current calendar day in the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the day cannot be resolved or the journal
    /// cannot be scanned.
    pub async fn report_today(&self, breakdown: bool) -> Result<Report, ReportError> {
        let range = TimeRange::day_containing(self.clock.now(), self.timezone)?;
        self.report(range, breakdown).await
    }
}

/// Fold transactions into a report.
///
/// Only transactions whose `created_at` falls in `range` count. Product rows
/// are ordered by revenue descending, then product id ascending.
///
/// # Errors
///
/// Returns `ReportError::Overflow` if revenue leaves the money range.
pub fn aggregate(
    range: TimeRange,
    timezone: Tz,
    transactions: &[Transaction],
    breakdown: bool,
) -> Result<Report, ReportError> {
    let mut total_revenue = Money::ZERO;
    let mut transaction_count = 0_u64;
    let mut per_product: BTreeMap<ProductId, ProductSales> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| range.contains(t.created_at)) {
        transaction_count += 1;
        total_revenue = total_revenue.checked_add(transaction.total)?;

        for item in &transaction.items {
            let entry = per_product
                .entry(item.product_id)
                .or_insert_with(|| ProductSales {
                    product_id: item.product_id,
                    product_name: item.product_name.clone(),
                    quantity_sold: 0,
                    revenue: Money::ZERO,
                });
            entry.quantity_sold += i64::from(item.quantity);
            entry.revenue = entry.revenue.checked_add(item.subtotal)?;
            // Journal order is id order, so the last seen name is the newest.
            entry.product_name.clone_from(&item.product_name);
        }
    }

    // Lower id ranks higher on equal quantity.
    let top_product = per_product
        .values()
        .max_by(|a, b| {
            a.quantity_sold
                .cmp(&b.quantity_sold)
                .then_with(|| b.product_id.cmp(&a.product_id))
        })
        .cloned();

    let products = breakdown.then(|| {
        let mut rows: Vec<ProductSales> = per_product.into_values().collect();
        rows.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        rows
    });

    Ok(Report {
        range_start: range.start(),
        range_end: range.end(),
        timezone,
        total_revenue,
        transaction_count,
        top_product,
        products,
    })
}
