//! In-memory transaction store.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use payflow_types::{
    ErrorRecord, RefundId, RefundResult, StoreError, TransactionId, TransactionResult,
    TransactionStore,
};

/// A thread-safe in-memory store for transactions, refunds and the error log.
///
/// Contents live for the process lifetime only.
#[derive(Default)]
pub struct InMemoryStore {
    transactions: DashMap<TransactionId, TransactionResult>,
    refunds: DashMap<RefundId, RefundResult>,
    errors: Mutex<Vec<ErrorRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the error log, oldest first.
    pub async fn error_log(&self) -> Vec<ErrorRecord> {
        self.errors.lock().await.clone()
    }

    /// Refunds recorded against `transaction_id`, oldest first.
    pub fn refunds_for(&self, transaction_id: TransactionId) -> Vec<RefundResult> {
        let mut refunds: Vec<_> = self
            .refunds
            .iter()
            .filter(|r| r.transaction_id == transaction_id)
            .map(|r| r.value().clone())
            .collect();
        refunds.sort_by_key(|r| r.timestamp);
        refunds
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn save_transaction(&self, result: &TransactionResult) -> Result<(), StoreError> {
        self.transactions
            .insert(result.transaction_id, result.clone());
        tracing::debug!(transaction_id = %result.transaction_id, "Saved transaction");
        Ok(())
    }

    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<TransactionResult>, StoreError> {
        Ok(self.transactions.get(&id).map(|t| t.value().clone()))
    }

    async fn get_user_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionResult>, StoreError> {
        let mut transactions: Vec<_> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.value().clone())
            .collect();

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions.truncate(limit);
        Ok(transactions)
    }

    async fn save_refund(&self, refund: &RefundResult) -> Result<(), StoreError> {
        self.refunds.insert(refund.refund_id, refund.clone());
        tracing::debug!(
            refund_id = %refund.refund_id,
            transaction_id = %refund.transaction_id,
            "Saved refund"
        );
        Ok(())
    }

    async fn log_error(&self, record: ErrorRecord) -> Result<(), StoreError> {
        tracing::debug!(error_type = %record.error_type, user_id = %record.user_id, "Logged payment error");
        self.errors.lock().await.push(record);
        Ok(())
    }
}
