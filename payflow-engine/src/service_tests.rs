//! PaymentProcessor unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use payflow_types::{
        Currency, ErrorRecord, GatewayError, Notifier, NotifyError, PaymentError,
        PaymentGateway, PaymentRequest, RefundResult, StoreError, TransactionId,
        TransactionResult, TransactionStore,
    };

    use crate::{EngineConfig, FixedJitter, PaymentProcessor};

    // ─────────────────────────────────────────────────────────────────────────────
    // Recording mocks
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gateway that approves charges unless a failure is scripted.
    pub struct MockGateway {
        fail_with: Option<GatewayError>,
        charges: AtomicUsize,
        refunds: Mutex<Vec<(TransactionId, Decimal)>>,
    }

    impl MockGateway {
        pub fn approving() -> Self {
            Self {
                fail_with: None,
                charges: AtomicUsize::new(0),
                refunds: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(err: GatewayError) -> Self {
            Self {
                fail_with: Some(err),
                ..Self::approving()
            }
        }

        pub fn charge_count(&self) -> usize {
            self.charges.load(Ordering::SeqCst)
        }

        pub fn refund_calls(&self) -> Vec<(TransactionId, Decimal)> {
            self.refunds.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn charge(
            &self,
            request: &PaymentRequest,
        ) -> Result<TransactionResult, GatewayError> {
            self.charges.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(TransactionResult::completed(
                request.user_id.clone(),
                request.amount,
                request.currency.parse().unwrap(),
                serde_json::json!({ "status": "success" }),
            ))
        }

        async fn refund(
            &self,
            transaction_id: TransactionId,
            amount: Decimal,
        ) -> Result<RefundResult, GatewayError> {
            self.refunds.lock().unwrap().push((transaction_id, amount));
            Ok(RefundResult::completed(
                transaction_id,
                amount,
                Currency::USD,
                serde_json::json!({ "status": "refunded" }),
            ))
        }
    }

    #[derive(Default)]
    pub struct MockStore {
        pub fail_saves: bool,
        transactions: Mutex<Vec<TransactionResult>>,
        refunds: Mutex<Vec<RefundResult>>,
        errors: Mutex<Vec<ErrorRecord>>,
    }

    impl MockStore {
        pub fn saved(&self) -> Vec<TransactionResult> {
            self.transactions.lock().unwrap().clone()
        }

        pub fn refunds(&self) -> Vec<RefundResult> {
            self.refunds.lock().unwrap().clone()
        }

        pub fn errors(&self) -> Vec<ErrorRecord> {
            self.errors.lock().unwrap().clone()
        }

        pub fn seed(&self, tx: TransactionResult) {
            self.transactions.lock().unwrap().push(tx);
        }
    }

    #[async_trait]
    impl TransactionStore for MockStore {
        async fn save_transaction(&self, result: &TransactionResult) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.transactions.lock().unwrap().push(result.clone());
            Ok(())
        }

        async fn get_transaction(
            &self,
            id: TransactionId,
        ) -> Result<Option<TransactionResult>, StoreError> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.transaction_id == id)
                .cloned())
        }

        async fn get_user_transactions(
            &self,
            user_id: &str,
            limit: usize,
        ) -> Result<Vec<TransactionResult>, StoreError> {
            let mut txs: Vec<_> = self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect();
            txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            txs.truncate(limit);
            Ok(txs)
        }

        async fn save_refund(&self, refund: &RefundResult) -> Result<(), StoreError> {
            self.refunds.lock().unwrap().push(refund.clone());
            Ok(())
        }

        async fn log_error(&self, record: ErrorRecord) -> Result<(), StoreError> {
            self.errors.lock().unwrap().push(record);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum Sent {
        Receipt(String),
        FraudAlert(String),
        Failure(String, String),
    }

    #[derive(Default)]
    pub struct MockNotifier {
        pub fail: bool,
        sent: Mutex<Vec<Sent>>,
    }

    impl MockNotifier {
        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn record(&self, msg: Sent) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(msg);
            if self.fail {
                return Err(NotifyError("smtp unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send_receipt(
            &self,
            email: &str,
            _result: &TransactionResult,
        ) -> Result<(), NotifyError> {
            self.record(Sent::Receipt(email.to_string()))
        }

        async fn send_fraud_alert(&self, request: &PaymentRequest) -> Result<(), NotifyError> {
            self.record(Sent::FraudAlert(request.user_id.clone()))
        }

        async fn send_payment_failure(&self, email: &str, message: &str) -> Result<(), NotifyError> {
            self.record(Sent::Failure(email.to_string(), message.to_string()))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Fixtures
    // ─────────────────────────────────────────────────────────────────────────────

    type TestProcessor = PaymentProcessor<MockGateway, MockStore, MockNotifier>;

    fn processor() -> TestProcessor {
        PaymentProcessor::new(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier::default(),
        )
        .with_jitter(FixedJitter(0.0))
    }

    fn processor_with_gateway(gateway: MockGateway) -> TestProcessor {
        PaymentProcessor::new(gateway, MockStore::default(), MockNotifier::default())
            .with_jitter(FixedJitter(0.0))
    }

    fn valid_request() -> PaymentRequest {
        PaymentRequest::new(
            "user_123",
            dec!(50),
            "USD",
            "4111 1111 1111 1111",
            "123",
            "a@b.com",
        )
        .with_billing_zip("12345")
    }

    /// High amount, no zip and a disposable email: 0.8 before jitter.
    fn risky_request() -> PaymentRequest {
        PaymentRequest::new(
            "user_risky",
            dec!(9000),
            "USD",
            "4111111111111111",
            "123",
            "test@tempmail.com",
        )
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // process
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_process_success() {
        let processor = processor();

        let result = processor.process(&valid_request()).await.unwrap();

        assert_eq!(result.amount, dec!(50));
        assert_eq!(result.currency, Currency::USD);
        assert_eq!(processor.gateway().charge_count(), 1);
        assert_eq!(processor.store().saved(), vec![result]);
        assert_eq!(
            processor.notifier().sent(),
            vec![Sent::Receipt("a@b.com".into())]
        );
        assert!(processor.store().errors().is_empty());
    }

    #[tokio::test]
    async fn test_process_validation_error() {
        let processor = processor();
        let req = PaymentRequest {
            amount: Decimal::ZERO,
            ..valid_request()
        };

        let result = processor.process(&req).await;

        assert!(matches!(result, Err(PaymentError::Validation(ref m)) if m == "Invalid payment data"));
        assert_eq!(processor.gateway().charge_count(), 0);
        assert!(processor.notifier().sent().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_does_not_consume_rate_limit() {
        let processor = PaymentProcessor::with_config(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier::default(),
            EngineConfig {
                rate_limit_max_requests: 1,
                ..EngineConfig::default()
            },
        )
        .with_jitter(FixedJitter(0.0));
        let bad = PaymentRequest {
            card_number: "1234".into(),
            ..valid_request()
        };

        assert!(processor.process(&bad).await.is_err());
        assert!(processor.process(&valid_request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_process_rate_limited() {
        let processor = PaymentProcessor::with_config(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier::default(),
            EngineConfig {
                rate_limit_max_requests: 2,
                rate_limit_window: Duration::from_secs(60),
                fraud_threshold: 0.8,
            },
        )
        .with_jitter(FixedJitter(0.0));

        processor.process(&valid_request()).await.unwrap();
        processor.process(&valid_request()).await.unwrap();
        let result = processor.process(&valid_request()).await;

        assert!(
            matches!(result, Err(PaymentError::RateLimited { ref user_id }) if user_id == "user_123")
        );
        assert_eq!(processor.gateway().charge_count(), 2);

        let other_user = PaymentRequest {
            user_id: "user_456".into(),
            ..valid_request()
        };
        assert!(processor.process(&other_user).await.is_ok());
    }

    #[tokio::test]
    async fn test_process_fraud_detected() {
        let processor = processor().with_jitter(FixedJitter(1.0));

        let result = processor.process(&risky_request()).await;

        match result {
            Err(PaymentError::Fraud { score }) => assert_eq!(score, 1.0),
            other => panic!("expected fraud error, got {other:?}"),
        }
        assert_eq!(processor.gateway().charge_count(), 0);
        assert!(processor.store().saved().is_empty());
        assert_eq!(
            processor.notifier().sent(),
            vec![Sent::FraudAlert("user_risky".into())]
        );
    }

    #[tokio::test]
    async fn test_fraud_threshold_is_configurable() {
        let processor = PaymentProcessor::with_config(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier::default(),
            EngineConfig {
                fraud_threshold: 0.1,
                ..EngineConfig::default()
            },
        )
        .with_jitter(FixedJitter(0.0));
        // missing zip alone scores 0.2
        let req = PaymentRequest {
            billing_zip: None,
            ..valid_request()
        };

        let result = processor.process(&req).await;

        assert!(matches!(result, Err(PaymentError::Fraud { .. })));
    }

    #[tokio::test]
    async fn test_fraud_alert_failure_still_reports_fraud() {
        let processor = PaymentProcessor::new(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier {
                fail: true,
                ..MockNotifier::default()
            },
        )
        .with_jitter(FixedJitter(1.0));

        let result = processor.process(&risky_request()).await;

        assert!(matches!(result, Err(PaymentError::Fraud { .. })));
        assert_eq!(processor.gateway().charge_count(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_logged_and_notified() {
        let processor = processor_with_gateway(MockGateway::failing(GatewayError::with_code(
            GatewayError::INSUFFICIENT_FUNDS,
            "Insufficient funds",
        )));

        let result = processor.process(&valid_request()).await;

        assert!(
            matches!(result, Err(PaymentError::Gateway(ref e)) if e.code() == Some("INSUFFICIENT_FUNDS"))
        );
        let errors = processor.store().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, "PaymentGatewayError");
        assert_eq!(errors[0].user_id, "user_123");
        assert_eq!(errors[0].amount, dec!(50));
        assert_eq!(
            processor.notifier().sent(),
            vec![Sent::Failure(
                "a@b.com".into(),
                "Payment failed due to insufficient funds".into()
            )]
        );
        assert!(processor.store().saved().is_empty());
    }

    #[tokio::test]
    async fn test_card_declined_is_notified() {
        let processor = processor_with_gateway(MockGateway::failing(GatewayError::with_code(
            GatewayError::CARD_DECLINED,
            "Do not honor",
        )));

        let result = processor.process(&valid_request()).await;

        assert!(matches!(result, Err(PaymentError::Gateway(_))));
        assert_eq!(
            processor.notifier().sent(),
            vec![Sent::Failure(
                "a@b.com".into(),
                "Your card was declined".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_uncoded_gateway_error_is_logged_without_notice() {
        let processor =
            processor_with_gateway(MockGateway::failing(GatewayError::new("connection reset")));

        let result = processor.process(&valid_request()).await;

        assert!(matches!(result, Err(PaymentError::Gateway(ref e)) if e.code().is_none()));
        assert_eq!(processor.store().errors().len(), 1);
        assert!(processor.notifier().sent().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_logged_and_returned() {
        let processor = PaymentProcessor::new(
            MockGateway::approving(),
            MockStore {
                fail_saves: true,
                ..MockStore::default()
            },
            MockNotifier::default(),
        )
        .with_jitter(FixedJitter(0.0));

        let result = processor.process(&valid_request()).await;

        assert!(matches!(result, Err(PaymentError::Store(_))));
        let errors = processor.store().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, "StoreError");
        // no receipt for an unsaved transaction
        assert!(processor.notifier().sent().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_failure_is_logged_and_returned() {
        let processor = PaymentProcessor::new(
            MockGateway::approving(),
            MockStore::default(),
            MockNotifier {
                fail: true,
                ..MockNotifier::default()
            },
        )
        .with_jitter(FixedJitter(0.0));

        let result = processor.process(&valid_request()).await;

        assert!(matches!(result, Err(PaymentError::Notify(_))));
        let errors = processor.store().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, "NotifyError");
        // the charge already went through, so the transaction stays saved
        assert_eq!(processor.store().saved().len(), 1);
        assert_eq!(
            processor.notifier().sent(),
            vec![Sent::Receipt("a@b.com".into())]
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // refund
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_full_refund_uses_original_amount() {
        let processor = processor();
        let tx = processor.process(&valid_request()).await.unwrap();

        let refund = processor.refund(tx.transaction_id, None).await.unwrap();

        assert_eq!(refund.amount, dec!(50));
        assert_eq!(refund.transaction_id, tx.transaction_id);
        assert_eq!(
            processor.gateway().refund_calls(),
            vec![(tx.transaction_id, dec!(50))]
        );
        assert_eq!(processor.store().refunds(), vec![refund]);
    }

    #[tokio::test]
    async fn test_partial_refund() {
        let processor = processor();
        let tx = processor.process(&valid_request()).await.unwrap();

        let refund = processor
            .refund(tx.transaction_id, Some(dec!(20.25)))
            .await
            .unwrap();

        assert_eq!(refund.amount, dec!(20.25));
    }

    #[tokio::test]
    async fn test_refund_exceeding_original_fails_without_gateway_call() {
        let processor = processor();
        let tx = processor.process(&valid_request()).await.unwrap();

        let result = processor.refund(tx.transaction_id, Some(dec!(50.01))).await;

        assert!(matches!(
            result,
            Err(PaymentError::InvalidRefundAmount { requested, original })
                if requested == dec!(50.01) && original == dec!(50)
        ));
        assert!(processor.gateway().refund_calls().is_empty());
        assert!(processor.store().refunds().is_empty());
    }

    #[tokio::test]
    async fn test_refund_non_positive_amount_fails() {
        let processor = processor();
        let tx = processor.process(&valid_request()).await.unwrap();

        for amount in [Decimal::ZERO, dec!(-5)] {
            let result = processor.refund(tx.transaction_id, Some(amount)).await;
            assert!(matches!(result, Err(PaymentError::InvalidRefundAmount { .. })));
        }
        assert!(processor.gateway().refund_calls().is_empty());
    }

    #[tokio::test]
    async fn test_refund_unknown_transaction() {
        let processor = processor();
        let id = TransactionId::new();

        let result = processor.refund(id, None).await;

        assert!(matches!(result, Err(PaymentError::TransactionNotFound(missing)) if missing == id));
        assert!(processor.gateway().refund_calls().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // history
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_history_newest_first_and_limited() {
        let processor = processor();
        let base = chrono::Utc::now();
        for minutes in 0..12 {
            let mut tx = TransactionResult::completed(
                "user_123",
                Decimal::from(minutes + 1),
                Currency::USD,
                serde_json::Value::Null,
            );
            tx.timestamp = base + chrono::Duration::minutes(minutes);
            processor.store().seed(tx);
        }

        let default_page = processor.history("user_123", None).await.unwrap();
        assert_eq!(default_page.len(), 10);
        assert_eq!(default_page[0].amount, dec!(12));
        assert!(
            default_page
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp)
        );

        let short = processor.history("user_123", Some(3)).await.unwrap();
        assert_eq!(short.len(), 3);

        assert!(processor.history("nobody", None).await.unwrap().is_empty());
    }
}
