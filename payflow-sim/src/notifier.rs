//! Notifier that writes notifications to the tracing log.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use payflow_types::{Notifier, NotifyError, PaymentRequest, TransactionResult};

/// Emits every notification as a structured log event instead of sending it.
#[derive(Default)]
pub struct TracingNotifier {
    delivered: AtomicUsize,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications emitted so far.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_receipt(
        &self,
        email: &str,
        result: &TransactionResult,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            to = email,
            transaction_id = %result.transaction_id,
            total = %result.money(),
            "Receipt sent"
        );
        self.bump();
        Ok(())
    }

    async fn send_fraud_alert(&self, request: &PaymentRequest) -> Result<(), NotifyError> {
        tracing::warn!(
            user_id = %request.user_id,
            amount = %request.amount,
            currency = %request.currency,
            last4 = %request.card_last4(),
            "Fraud alert raised"
        );
        self.bump();
        Ok(())
    }

    async fn send_payment_failure(&self, email: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(to = email, notice = message, "Payment failure notice sent");
        self.bump();
        Ok(())
    }
}
