//! Customer notification port.

use crate::domain::{PaymentRequest, TransactionResult};
use crate::error::NotifyError;

/// Sends receipts and alerts (email, SMS, ...).
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Sends a receipt for a completed payment.
    async fn send_receipt(&self, email: &str, result: &TransactionResult)
    -> Result<(), NotifyError>;

    /// Alerts the risk team about a request that was blocked as fraudulent.
    async fn send_fraud_alert(&self, request: &PaymentRequest) -> Result<(), NotifyError>;

    /// Tells the customer their payment failed.
    async fn send_payment_failure(&self, email: &str, message: &str) -> Result<(), NotifyError>;
}
