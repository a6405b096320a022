//! Refund domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Currency;
use super::transaction::TransactionId;

/// Unique identifier for a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefundId(Uuid);

impl RefundId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RefundId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RefundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Completed,
    Pending,
}

/// A refund issued against an earlier transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResult {
    pub refund_id: RefundId,
    /// The transaction being refunded
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: RefundStatus,
    pub timestamp: DateTime<Utc>,
    pub gateway_response: serde_json::Value,
}

impl RefundResult {
    /// Creates a completed refund stamped with the current time.
    pub fn completed(
        transaction_id: TransactionId,
        amount: Decimal,
        currency: Currency,
        gateway_response: serde_json::Value,
    ) -> Self {
        Self {
            refund_id: RefundId::new(),
            transaction_id,
            amount,
            currency,
            status: RefundStatus::Completed,
            timestamp: Utc::now(),
            gateway_response,
        }
    }
}
