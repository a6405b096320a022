//! Payment gateway port.
//!
//! Implementations talk to a card processor (or simulate one).

use rust_decimal::Decimal;

use crate::domain::{PaymentRequest, RefundResult, TransactionId, TransactionResult};
use crate::error::GatewayError;

/// Port trait for the external charge/refund gateway.
///
/// Calls may fail or hang; the workflow imposes no timeout of its own, so
/// implementations are expected to apply their own.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Charges the card described by `request`.
    async fn charge(&self, request: &PaymentRequest) -> Result<TransactionResult, GatewayError>;

    /// Refunds `amount` of a previously charged transaction.
    async fn refund(
        &self,
        transaction_id: TransactionId,
        amount: Decimal,
    ) -> Result<RefundResult, GatewayError>;
}
