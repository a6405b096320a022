//! Error types for the payment workflow.

use rust_decimal::Decimal;

use crate::domain::TransactionId;

/// Returned when a currency code is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

/// Failure reported by the payment gateway.
///
/// The optional `code` is the gateway's machine-readable reason and selects
/// the message shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Payment gateway error: {message}")]
pub struct GatewayError {
    pub code: Option<String>,
    pub message: String,
}

impl GatewayError {
    pub const INSUFFICIENT_FUNDS: &'static str = "INSUFFICIENT_FUNDS";
    pub const CARD_DECLINED: &'static str = "CARD_DECLINED";

    /// Creates a gateway error without a reason code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Creates a gateway error carrying a reason code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Transaction store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found")]
    NotFound,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Notification delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Errors surfaced by the payment workflow.
///
/// Maps cleanly to HTTP status codes in the inbound adapter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PaymentError {
    #[error("{0}")]
    Validation(String),

    #[error("Too many payment attempts for user {user_id}")]
    RateLimited { user_id: String },

    #[error("Payment flagged as fraudulent (score: {score:.2})")]
    Fraud { score: f64 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    #[error("Invalid refund amount {requested}: original transaction was {original}")]
    InvalidRefundAmount { requested: Decimal, original: Decimal },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl PaymentError {
    /// Stable name of the error kind, written to the store's error log.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::Validation(_) => "ValidationError",
            PaymentError::RateLimited { .. } => "RateLimitError",
            PaymentError::Fraud { .. } => "FraudError",
            PaymentError::Gateway(_) => "PaymentGatewayError",
            PaymentError::TransactionNotFound(_) => "TransactionNotFound",
            PaymentError::InvalidRefundAmount { .. } => "InvalidRefundAmount",
            PaymentError::Store(_) => "StoreError",
            PaymentError::Notify(_) => "NotifyError",
        }
    }

    /// Returns the gateway reason code, if this is a coded gateway failure.
    pub fn gateway_code(&self) -> Option<&str> {
        match self {
            PaymentError::Gateway(err) => err.code(),
            _ => None,
        }
    }
}
