//! Engine policy settings.

use std::time::Duration;

/// Tunables for the payment workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Attempts allowed per user inside `rate_limit_window`
    pub rate_limit_max_requests: usize,
    pub rate_limit_window: Duration,
    /// Requests scoring strictly above this are blocked
    pub fraud_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_limit_max_requests: 100,
            rate_limit_window: Duration::from_secs(60),
            fraud_threshold: 0.8,
        }
    }
}
