//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wdi_billing::BillingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Validation errors
    #[error("Unknown subscription tier: {0}")]
    InvalidTier(String),

    // Billing errors
    #[error("Webhook signature verification failed")]
    InvalidWebhookSignature,
    #[error("Failed to start checkout. Please try again.")]
    CheckoutFailed,
    #[error("Webhook processing failed")]
    WebhookProcessing,

    // Internal errors
    #[error("Internal server error")]
    Internal,
    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            // Validation
            ApiError::InvalidTier(_) => (StatusCode::BAD_REQUEST, "INVALID_TIER"),

            // Billing
            ApiError::InvalidWebhookSignature => (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE"),
            ApiError::CheckoutFailed => (StatusCode::BAD_GATEWAY, "CHECKOUT_FAILED"),
            ApiError::WebhookProcessing => {
                (StatusCode::INTERNAL_SERVER_ERROR, "WEBHOOK_PROCESSING_FAILED")
            }

            // Internal
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Provider and configuration details stay in the logs; callers get coarse errors
impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidTier(tier) => ApiError::InvalidTier(tier),
            BillingError::MissingPriceId(_) => {
                tracing::error!(error = %err, "Billing misconfigured");
                ApiError::Internal
            }
            BillingError::CheckoutCreation(_) | BillingError::StripeApi(_) => {
                tracing::error!(error = %err, "Checkout creation failed");
                ApiError::CheckoutFailed
            }
            BillingError::WebhookSignatureInvalid => ApiError::InvalidWebhookSignature,
            BillingError::Fulfillment(_) => {
                tracing::error!(error = %err, "Webhook handling error");
                ApiError::WebhookProcessing
            }
            BillingError::SessionLookup(_) => {
                tracing::error!(error = %err, "Checkout session lookup failed");
                ApiError::Internal
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
