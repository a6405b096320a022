//! Transaction result domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::{Currency, Money};

/// Unique identifier for a charged transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Outcome reported by the gateway for a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Completed,
    /// Accepted by the gateway but not yet settled
    Pending,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::Pending => write!(f, "PENDING"),
        }
    }
}

/// A successfully charged payment.
///
/// Only produced after the gateway accepts a charge; owned by the caller once
/// returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub transaction_id: TransactionId,
    /// User the charge was made for
    pub user_id: String,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub currency: Currency,
    pub timestamp: DateTime<Utc>,
    /// Opaque payload returned by the gateway
    pub gateway_response: serde_json::Value,
}

impl TransactionResult {
    /// Creates a completed transaction stamped with the current time.
    pub fn completed(
        user_id: impl Into<String>,
        amount: Decimal,
        currency: Currency,
        gateway_response: serde_json::Value,
    ) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            user_id: user_id.into(),
            status: TransactionStatus::Completed,
            amount,
            currency,
            timestamp: Utc::now(),
            gateway_response,
        }
    }

    pub fn money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }
}
