//! Billing error types

use thiserror::Error;
use wdi_shared::{SiteError, Tier};

/// Billing-specific errors
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Stripe API error: {0}")]
    StripeApi(String),

    #[error("No price ID configured for tier: {0}")]
    MissingPriceId(Tier),

    #[error("Invalid subscription tier: {0}")]
    InvalidTier(String),

    #[error("Failed to create checkout session: {0}")]
    CheckoutCreation(String),

    #[error("Failed to retrieve checkout session: {0}")]
    SessionLookup(String),

    #[error("Webhook signature verification failed")]
    WebhookSignatureInvalid,

    #[error("Webhook fulfillment failed: {0}")]
    Fulfillment(String),
}

impl BillingError {
    /// Deployment defects (a tier without a price mapping), as opposed to
    /// user or provider failures
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingPriceId(_))
    }
}

impl From<stripe::StripeError> for BillingError {
    fn from(err: stripe::StripeError) -> Self {
        BillingError::StripeApi(err.to_string())
    }
}

impl From<SiteError> for BillingError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::UnknownTier(tier) => BillingError::InvalidTier(tier),
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
