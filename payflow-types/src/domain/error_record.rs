//! Error log entries written when a charge fails.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A failed charge attempt, as recorded by the transaction store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Stable error kind, e.g. `PaymentGatewayError`
    pub error_type: String,
    pub error_message: String,
    pub user_id: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}
