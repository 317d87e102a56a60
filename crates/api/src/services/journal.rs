//! Append-only record of completed sales.

use async_trait::async_trait;
use thiserror::Error;

use kasir_core::{TimeRange, TransactionId};

use crate::models::{NewTransaction, Transaction};

/// Errors from the transaction journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored data could not be read back.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<sqlx::Error> for JournalError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Store of completed sales. Records are never updated or deleted.
#[async_trait]
pub trait TransactionJournal: Send + Sync {
    /// Store a sale with all its items, or nothing.
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, JournalError>;

    /// Sales with `created_at` inside `range`, ordered by id. Only fully
    /// appended sales are returned.
    async fn scan(&self, range: TimeRange) -> Result<Vec<Transaction>, JournalError>;

    /// One sale by id.
    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, JournalError>;
}
