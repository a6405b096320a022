//! Payment Workflow Service
//!
//! Runs one payment attempt through a fixed policy chain:
//! validate, rate-limit, fraud-score, charge, persist, notify.
//! Contains NO infrastructure logic - the gateway, store and notifier are
//! injected ports.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use payflow_types::{
    DEFAULT_HISTORY_LIMIT, ErrorRecord, GatewayError, Notifier, PaymentError, PaymentGateway,
    PaymentRequest, RefundResult, TransactionId, TransactionResult, TransactionStore,
};

use crate::config::EngineConfig;
use crate::fraud::{FraudScorer, JitterSource};
use crate::rate_limit::RateLimiter;
use crate::validation::validate_payment_request;

/// Orchestrates payments over the gateway, store and notifier ports.
///
/// Generic over the three ports - adapters are injected at compile time.
/// This enables:
/// - Swapping the real gateway for a simulated one
/// - Testing with recording mocks
/// - Compile-time checks for port implementations
pub struct PaymentProcessor<G, S, N> {
    gateway: G,
    store: S,
    notifier: N,
    rate_limiter: Arc<RateLimiter>,
    fraud_scorer: FraudScorer,
    fraud_threshold: f64,
}

impl<G, S, N> PaymentProcessor<G, S, N>
where
    G: PaymentGateway,
    S: TransactionStore,
    N: Notifier,
{
    /// Creates a processor with the default policy (100 attempts/min, threshold 0.8).
    pub fn new(gateway: G, store: S, notifier: N) -> Self {
        Self::with_config(gateway, store, notifier, EngineConfig::default())
    }

    pub fn with_config(gateway: G, store: S, notifier: N, config: EngineConfig) -> Self {
        Self {
            gateway,
            store,
            notifier,
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window,
            )),
            fraud_scorer: FraudScorer::default(),
            fraud_threshold: config.fraud_threshold,
        }
    }

    /// Replaces the random component of fraud scoring.
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.fraud_scorer = FraudScorer::new(jitter);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Shared handle to the limiter, for background sweeping.
    pub fn shared_rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.rate_limiter)
    }

    pub fn fraud_scorer(&self) -> &FraudScorer {
        &self.fraud_scorer
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────────

    /// Processes one payment attempt end to end.
    ///
    /// Validation, rate limiting and fraud screening all run before anything
    /// external is mutated. A failure while charging, saving or sending the
    /// receipt is written to the error log and (for known decline codes)
    /// reported to the customer before it is returned.
    #[tracing::instrument(
        skip(self, request),
        fields(user_id = %request.user_id, amount = %request.amount, currency = %request.currency)
    )]
    pub async fn process(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransactionResult, PaymentError> {
        if !validate_payment_request(request) {
            warn!("Rejected invalid payment data");
            return Err(PaymentError::Validation("Invalid payment data".into()));
        }

        if !self.rate_limiter.check(&request.user_id) {
            warn!("Rate limit exceeded");
            return Err(PaymentError::RateLimited {
                user_id: request.user_id.clone(),
            });
        }

        let score = self.fraud_scorer.score(request);
        if score > self.fraud_threshold {
            warn!(score, threshold = self.fraud_threshold, "Payment flagged as fraudulent");
            if let Err(e) = self.notifier.send_fraud_alert(request).await {
                error!("Failed to send fraud alert: {}", e);
            }
            return Err(PaymentError::Fraud { score });
        }

        match self.charge_and_record(request).await {
            Ok(result) => {
                info!(transaction_id = %result.transaction_id, "Payment completed");
                Ok(result)
            }
            Err(err) => {
                self.handle_payment_error(&err, request).await;
                Err(err)
            }
        }
    }

    async fn charge_and_record(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransactionResult, PaymentError> {
        let result = self.gateway.charge(request).await?;
        self.store.save_transaction(&result).await?;
        self.notifier.send_receipt(&request.email, &result).await?;
        Ok(result)
    }

    /// Logs a charge-stage failure and tells the customer when the gateway
    /// gave a reason we have a message for. Errors here are only logged.
    async fn handle_payment_error(&self, err: &PaymentError, request: &PaymentRequest) {
        error!(kind = err.kind(), "Payment failed: {}", err);

        let record = ErrorRecord {
            error_type: err.kind().to_string(),
            error_message: err.to_string(),
            user_id: request.user_id.clone(),
            amount: request.amount,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.store.log_error(record).await {
            error!("Failed to log payment error: {}", e);
        }

        let message = match err.gateway_code() {
            Some(GatewayError::INSUFFICIENT_FUNDS) => "Payment failed due to insufficient funds",
            Some(GatewayError::CARD_DECLINED) => "Your card was declined",
            _ => return,
        };
        if let Err(e) = self
            .notifier
            .send_payment_failure(&request.email, message)
            .await
        {
            error!("Failed to send payment failure notice: {}", e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Refunds & History
    // ─────────────────────────────────────────────────────────────────────────────

    /// Refunds a transaction, in full when `amount` is `None`.
    #[tracing::instrument(skip(self, transaction_id), fields(transaction_id = %transaction_id))]
    pub async fn refund(
        &self,
        transaction_id: TransactionId,
        amount: Option<Decimal>,
    ) -> Result<RefundResult, PaymentError> {
        let original = self
            .store
            .get_transaction(transaction_id)
            .await?
            .ok_or(PaymentError::TransactionNotFound(transaction_id))?;

        let refund_amount = amount.unwrap_or(original.amount);
        if refund_amount <= Decimal::ZERO || refund_amount > original.amount {
            warn!(%refund_amount, original = %original.amount, "Rejected refund amount");
            return Err(PaymentError::InvalidRefundAmount {
                requested: refund_amount,
                original: original.amount,
            });
        }

        let refund = self.gateway.refund(transaction_id, refund_amount).await?;
        self.store.save_refund(&refund).await?;

        info!(refund_id = %refund.refund_id, amount = %refund.amount, "Refund completed");
        Ok(refund)
    }

    /// Lists a user's transactions, newest first (10 when `limit` is `None`).
    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TransactionResult>, PaymentError> {
        self.store
            .get_user_transactions(user_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .await
            .map_err(Into::into)
    }
}
