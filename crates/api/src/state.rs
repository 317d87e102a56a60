//! Application state shared across handlers.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::services::{
    Catalog, CheckoutProcessor, Clock, InventoryLedger, ReportAggregator, TransactionJournal,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands out the storage
/// seams, so handlers never know which backend is behind them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn Catalog>,
    ledger: Arc<dyn InventoryLedger>,
    journal: Arc<dyn TransactionJournal>,
    clock: Arc<dyn Clock>,
    report_timezone: Tz,
}

impl AppState {
    /// Create application state from a single store that implements every seam.
    ///
    /// # Arguments
    ///
    /// * `store` - Catalog, ledger and journal (e.g. `PgStore`, `InMemoryStore`)
    /// * `clock` - Time source for sale timestamps and "today"
    /// * `report_timezone` - Timezone that defines a reporting day
    #[must_use]
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, report_timezone: Tz) -> Self
    where
        S: Catalog + InventoryLedger + TransactionJournal + 'static,
    {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: store.clone(),
                ledger: store.clone(),
                journal: store,
                clock,
                report_timezone,
            }),
        }
    }

    /// Get the product and category store.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.inner.catalog.as_ref()
    }

    /// Get the inventory ledger.
    #[must_use]
    pub fn ledger(&self) -> &dyn InventoryLedger {
        self.inner.ledger.as_ref()
    }

    /// Get the sales journal.
    #[must_use]
    pub fn journal(&self) -> &dyn TransactionJournal {
        self.inner.journal.as_ref()
    }

    /// Get the time source.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Get the timezone that defines a reporting day.
    #[must_use]
    pub fn report_timezone(&self) -> Tz {
        self.inner.report_timezone
    }

    /// Build a checkout processor over this state's seams.
    #[must_use]
    pub fn checkout(&self) -> CheckoutProcessor<'_> {
        CheckoutProcessor::new(self.catalog(), self.ledger(), self.journal(), self.clock())
    }

    /// Build a report aggregator over this state's journal.
    #[must_use]
    pub fn reports(&self) -> ReportAggregator<'_> {
        ReportAggregator::new(self.journal(), self.clock(), self.report_timezone())
    }
}
