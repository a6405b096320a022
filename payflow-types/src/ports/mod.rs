//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The payment workflow depends on these traits, not concrete implementations.

mod gateway;
mod notifier;
mod store;

pub use gateway::PaymentGateway;
pub use notifier::Notifier;
pub use store::TransactionStore;
