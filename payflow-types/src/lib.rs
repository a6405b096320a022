//! # Payflow Types
//!
//! Domain types and port traits for the payment workflow engine.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (PaymentRequest, TransactionResult, RefundResult)
//! - `ports/` - Trait definitions the gateway, store and notifier adapters implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Collaborator and workflow error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Currency, ErrorRecord, Money, PaymentRequest, RefundId, RefundResult, RefundStatus,
    TransactionId, TransactionResult, TransactionStatus,
};
pub use dto::*;
pub use error::{GatewayError, NotifyError, PaymentError, StoreError, UnsupportedCurrency};
pub use ports::{Notifier, PaymentGateway, TransactionStore};
