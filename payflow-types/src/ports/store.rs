//! Transaction store port.
//!
//! Adapters (in-memory, database) implement this trait.

use crate::domain::{ErrorRecord, RefundResult, TransactionId, TransactionResult};
use crate::error::StoreError;

/// Persistence for charged transactions, refunds and charge failures.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Saves a successfully charged transaction.
    async fn save_transaction(&self, result: &TransactionResult) -> Result<(), StoreError>;

    /// Gets a transaction by ID.
    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<TransactionResult>, StoreError>;

    /// Lists a user's transactions, newest first, at most `limit` entries.
    async fn get_user_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionResult>, StoreError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Refunds & Error Log
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a refund.
    async fn save_refund(&self, refund: &RefundResult) -> Result<(), StoreError>;

    /// Appends a charge failure to the error log.
    async fn log_error(&self, record: ErrorRecord) -> Result<(), StoreError>;
}
