//! # Payflow Sim
//!
//! In-process adapters (gateway, store, notifier) for the payment workflow
//! engine. Nothing here touches a network or disk: the store lives in memory
//! for the process lifetime and the gateway approves or declines charges by
//! simple card-number rules.

pub mod gateway;
pub mod notifier;
pub mod store;

pub use gateway::SimulatedGateway;
pub use notifier::TracingNotifier;
pub use store::InMemoryStore;
