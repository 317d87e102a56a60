//! Business logic services.
//!
//! # Services
//!
//! - `catalog` - Product and category storage seam
//! - `ledger` - Stock reservation and release
//! - `journal` - Append-only record of completed sales
//! - `checkout` - Validate a cart, reserve stock, record the sale
//! - `reports` - Revenue and per-product aggregation over a time range
//! - `clock` - Injectable time source
//! - `memory` - In-process implementations of the storage seams
//!
//! Storage seams are traits so the same services run against `PostgreSQL`
//! ([`crate::db::PgStore`]) or the in-process [`memory::InMemoryStore`].

pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod journal;
pub mod ledger;
pub mod memory;
pub mod reports;

pub use catalog::Catalog;
pub use checkout::{CheckoutError, CheckoutProcessor};
pub use clock::{Clock, ManualClock, SystemClock};
pub use journal::{JournalError, TransactionJournal};
pub use ledger::{InventoryLedger, LedgerError, Reservation};
pub use memory::InMemoryStore;
pub use reports::{ReportAggregator, ReportError};
