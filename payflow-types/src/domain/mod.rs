//! Domain models for the payment workflow.

pub mod error_record;
pub mod money;
pub mod payment;
pub mod refund;
pub mod transaction;

pub use error_record::ErrorRecord;
pub use money::{Currency, Money};
pub use payment::PaymentRequest;
pub use refund::{RefundId, RefundResult, RefundStatus};
pub use transaction::{TransactionId, TransactionResult, TransactionStatus};
