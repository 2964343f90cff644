//! Stripe Checkout sessions

use std::collections::HashMap;
use std::sync::Arc;

use wdi_shared::Tier;

use crate::client::StripeConfig;
use crate::error::{BillingError, BillingResult};
use crate::provider::{CheckoutLineItem, CheckoutMode, CheckoutProvider, CheckoutRequest};

/// Result of starting a checkout for a tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Custom-priced tier, handled by the contact form
    ContactForm,
    /// Hosted payment page created by the provider
    Hosted { session_id: String, url: String },
}

/// Checkout service for creating Stripe checkout sessions
pub struct CheckoutService {
    provider: Arc<dyn CheckoutProvider>,
    config: StripeConfig,
}

impl CheckoutService {
    pub fn new(provider: Arc<dyn CheckoutProvider>, config: StripeConfig) -> Self {
        Self { provider, config }
    }

    /// Get the config
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Start checkout for a tier.
    ///
    /// Custom tiers never reach the provider. A purchasable tier without a
    /// configured price fails before any network call.
    pub async fn create_checkout_session(&self, tier: Tier) -> BillingResult<CheckoutOutcome> {
        if tier.is_custom() {
            tracing::info!(tier = %tier, "Routing custom tier to contact form");
            return Ok(CheckoutOutcome::ContactForm);
        }

        let price_id = self.config.price_id_for_tier(tier).ok_or_else(|| {
            tracing::error!(tier = %tier, "No price ID configured for tier");
            BillingError::MissingPriceId(tier)
        })?;

        let request = self.subscription_request(tier, price_id);
        let mode = request.mode;

        let session = self
            .provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(tier = %tier, error = %e, "Stripe checkout session error");
                BillingError::CheckoutCreation(e.to_string())
            })?;

        let url = session.url.ok_or_else(|| {
            tracing::error!(
                tier = %tier,
                session_id = %session.id,
                "Checkout session returned without a hosted URL"
            );
            BillingError::CheckoutCreation("session has no redirect URL".to_string())
        })?;

        tracing::info!(
            session_id = %session.id,
            tier = %tier,
            mode = mode.as_str(),
            "Created checkout session"
        );

        Ok(CheckoutOutcome::Hosted {
            session_id: session.id,
            url,
        })
    }

    /// Subscription-mode request for one unit of the tier's price
    pub fn subscription_request(&self, tier: Tier, price_id: &str) -> CheckoutRequest {
        let mut metadata = HashMap::new();
        metadata.insert("tier".to_string(), tier.as_str().to_string());

        CheckoutRequest {
            mode: CheckoutMode::Subscription,
            line_items: vec![CheckoutLineItem {
                price: price_id.to_string(),
                quantity: 1,
            }],
            success_url: self.config.success_url(),
            cancel_url: self.config.cancel_url(),
            metadata,
        }
    }
}
