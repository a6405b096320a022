//! # Payflow Engine
//!
//! Payment workflow orchestration and HTTP adapter.
//!
//! ## Architecture
//!
//! - `service/` - `PaymentProcessor` (validate, rate-limit, score, charge, persist, notify)
//! - `validation/`, `fraud/`, `rate_limit/` - the policy steps the processor runs
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The processor is generic over the gateway, store and notifier ports,
//! allowing different adapters to be injected.

pub mod config;
pub mod fraud;
pub mod inbound;
pub mod rate_limit;
pub mod service;
pub mod validation;

#[cfg(test)]
mod service_tests;

pub use config::EngineConfig;
pub use fraud::{FixedJitter, FraudScorer, JitterSource, ThreadRngJitter};
pub use rate_limit::RateLimiter;
pub use service::PaymentProcessor;
pub use validation::validate_payment_request;
