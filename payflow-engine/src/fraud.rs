//! Heuristic fraud scoring.
//!
//! The score is a weighted sum of simple signals plus a bounded random
//! jitter, clamped to `[0, 1]`. It is not a trained model.

use std::sync::Arc;

use payflow_types::PaymentRequest;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HIGH_AMOUNT: Decimal = dec!(5000);
const ELEVATED_AMOUNT: Decimal = dec!(2000);

const HIGH_AMOUNT_WEIGHT: f64 = 0.3;
const ELEVATED_AMOUNT_WEIGHT: f64 = 0.2;
const MISSING_ZIP_WEIGHT: f64 = 0.2;
const DISPOSABLE_EMAIL_WEIGHT: f64 = 0.3;
const MAX_JITTER: f64 = 0.3;

const DISPOSABLE_EMAIL_MARKERS: [&str; 2] = ["test", "temp"];

/// Source of the random component of a fraud score.
pub trait JitterSource: Send + Sync {
    /// Returns a sample in `[0, 1)`.
    fn sample(&self) -> f64;
}

/// Jitter drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Constant jitter, for deterministic scoring.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}

/// Computes fraud scores for payment requests.
#[derive(Clone)]
pub struct FraudScorer {
    jitter: Arc<dyn JitterSource>,
}

impl Default for FraudScorer {
    fn default() -> Self {
        Self::new(ThreadRngJitter)
    }
}

impl FraudScorer {
    pub fn new(jitter: impl JitterSource + 'static) -> Self {
        Self {
            jitter: Arc::new(jitter),
        }
    }

    /// Scores `request`; higher means more likely fraudulent.
    pub fn score(&self, request: &PaymentRequest) -> f64 {
        let mut score = 0.0;

        if request.amount > HIGH_AMOUNT {
            score += HIGH_AMOUNT_WEIGHT;
        } else if request.amount > ELEVATED_AMOUNT {
            score += ELEVATED_AMOUNT_WEIGHT;
        }

        if !request.has_billing_zip() {
            score += MISSING_ZIP_WEIGHT;
        }

        let email = request.email.to_lowercase();
        if DISPOSABLE_EMAIL_MARKERS
            .iter()
            .any(|marker| email.contains(marker))
        {
            score += DISPOSABLE_EMAIL_WEIGHT;
        }

        score += self.jitter.sample() * MAX_JITTER;

        score.clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for FraudScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FraudScorer").finish_non_exhaustive()
    }
}
