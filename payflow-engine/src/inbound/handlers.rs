//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payflow_types::{
    ErrorResponse, HistoryQuery, Notifier, PaymentError, PaymentGateway, PaymentRequest,
    RefundRequest, TransactionId, TransactionStore,
};

use crate::PaymentProcessor;

/// Application state shared across handlers.
pub struct AppState<G, S, N> {
    pub processor: PaymentProcessor<G, S, N>,
}

/// Wrapper to implement IntoResponse for PaymentError (orphan rule workaround).
pub struct ApiError {
    error: PaymentError,
    retry_after_seconds: Option<u64>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        PaymentError::Validation(message.into()).into()
    }

    fn with_retry_after(mut self, seconds: u64) -> Self {
        if matches!(self.error, PaymentError::RateLimited { .. }) {
            self.retry_after_seconds = Some(seconds);
        }
        self
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PaymentError> for ApiError {
    fn from(error: PaymentError) -> Self {
        ApiError {
            error,
            retry_after_seconds: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            PaymentError::Validation(_) | PaymentError::InvalidRefundAmount { .. } => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            PaymentError::Fraud { .. } => StatusCode::FORBIDDEN,
            PaymentError::Gateway(_) => StatusCode::PAYMENT_REQUIRED,
            PaymentError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::Store(_) | PaymentError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.error.to_string(),
            code: status.as_u16(),
            gateway_code: self.error.gateway_code().map(str::to_string),
            retry_after_seconds: self.retry_after_seconds,
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Process a payment.
#[tracing::instrument(skip_all)]
pub async fn process_payment<G, S, N>(
    State(state): State<Arc<AppState<G, S, N>>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    G: PaymentGateway,
    S: TransactionStore,
    N: Notifier,
{
    let Json(req) = payload?;
    let retry_after = state.processor.rate_limiter().window().as_secs();
    let result = state
        .processor
        .process(&req)
        .await
        .map_err(|e| ApiError::from(e).with_retry_after(retry_after))?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Refund a transaction, fully or partially.
#[tracing::instrument(skip(state, payload), fields(transaction_id = %id))]
pub async fn refund_payment<G, S, N>(
    State(state): State<Arc<AppState<G, S, N>>>,
    Path(id): Path<String>,
    payload: Result<Json<RefundRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    G: PaymentGateway,
    S: TransactionStore,
    N: Notifier,
{
    let Json(req) = payload?;
    let transaction_id: TransactionId = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid transaction ID"))?;

    let refund = state.processor.refund(transaction_id, req.amount).await?;
    Ok(Json(refund))
}

/// List a user's recent transactions.
#[tracing::instrument(skip(state, query), fields(user_id = %user_id))]
pub async fn list_user_transactions<G, S, N>(
    State(state): State<Arc<AppState<G, S, N>>>,
    Path(user_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    G: PaymentGateway,
    S: TransactionStore,
    N: Notifier,
{
    let Query(query) = query?;
    let transactions = state
        .processor
        .history(&user_id, Some(query.limit))
        .await?;
    Ok(Json(transactions))
}
