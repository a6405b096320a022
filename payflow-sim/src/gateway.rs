//! Simulated card gateway.
//!
//! Approves every charge except a few reserved test cards, and keeps its
//! own ledger of charges so refunds can be checked against what was taken.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;

use payflow_types::{
    Currency, GatewayError, PaymentGateway, PaymentRequest, RefundResult, TransactionId,
    TransactionResult,
};

/// Cards ending in this are declined.
pub const DECLINED_CARD_SUFFIX: &str = "0002";
/// Cards ending in this fail for insufficient funds.
pub const INSUFFICIENT_FUNDS_CARD_SUFFIX: &str = "9995";

const PROVIDER: &str = "simulated";

struct ChargeEntry {
    amount: Decimal,
    currency: Currency,
    refunded: Decimal,
}

/// In-process stand-in for a card processor.
#[derive(Default)]
pub struct SimulatedGateway {
    charges: DashMap<TransactionId, ChargeEntry>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total refunded so far against a charge.
    pub fn refunded_amount(&self, transaction_id: TransactionId) -> Option<Decimal> {
        self.charges.get(&transaction_id).map(|c| c.refunded)
    }
}

fn authorization_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &PaymentRequest) -> Result<TransactionResult, GatewayError> {
        let card = request.normalized_card_number();

        if card.ends_with(DECLINED_CARD_SUFFIX) {
            return Err(GatewayError::with_code(
                GatewayError::CARD_DECLINED,
                "Card declined by issuer",
            ));
        }
        if card.ends_with(INSUFFICIENT_FUNDS_CARD_SUFFIX) {
            return Err(GatewayError::with_code(
                GatewayError::INSUFFICIENT_FUNDS,
                "Insufficient funds",
            ));
        }

        let currency = request
            .currency
            .parse::<Currency>()
            .map_err(|e| GatewayError::with_code("INVALID_CURRENCY", e.to_string()))?;

        let result = TransactionResult::completed(
            request.user_id.clone(),
            request.amount,
            currency,
            serde_json::json!({
                "provider": PROVIDER,
                "status": "success",
                "authorization_code": authorization_code(),
                "last4": request.card_last4(),
            }),
        );

        self.charges.insert(
            result.transaction_id,
            ChargeEntry {
                amount: result.amount,
                currency,
                refunded: Decimal::ZERO,
            },
        );

        tracing::info!(
            transaction_id = %result.transaction_id,
            last4 = %request.card_last4(),
            "Simulated charge approved"
        );
        Ok(result)
    }

    async fn refund(
        &self,
        transaction_id: TransactionId,
        amount: Decimal,
    ) -> Result<RefundResult, GatewayError> {
        let mut charge = self.charges.get_mut(&transaction_id).ok_or_else(|| {
            GatewayError::with_code(
                "UNKNOWN_TRANSACTION",
                format!("No charge {} at gateway", transaction_id),
            )
        })?;

        let remaining = charge.amount - charge.refunded;
        if amount > remaining {
            return Err(GatewayError::with_code(
                "REFUND_EXCEEDS_CHARGE",
                format!("Refund {} exceeds remaining {}", amount, remaining),
            ));
        }
        charge.refunded += amount;

        let refund = RefundResult::completed(
            transaction_id,
            amount,
            charge.currency,
            serde_json::json!({
                "provider": PROVIDER,
                "status": "refunded",
                "remaining": (remaining - amount).to_string(),
            }),
        );

        tracing::info!(refund_id = %refund.refund_id, %amount, "Simulated refund approved");
        Ok(refund)
    }
}
