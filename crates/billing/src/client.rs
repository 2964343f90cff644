//! Stripe client configuration

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionPaymentMethodTypes,
};
use wdi_shared::Tier;

use crate::error::{BillingError, BillingResult};
use crate::provider::{
    CheckoutMode, CheckoutProvider, CheckoutRequest, CheckoutSessionDetails, CreatedSession,
};

/// Placeholder the provider substitutes with the session id on redirect
pub const CHECKOUT_SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Default tolerance between a webhook's signed timestamp and now
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Configuration for Stripe billing
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Stripe secret API key
    pub secret_key: String,
    /// Stripe webhook signing secret
    pub webhook_secret: String,
    /// Price IDs for each subscription tier
    pub price_ids: PriceIds,
    /// Base URL for success/cancel redirects
    pub app_base_url: String,
    /// Maximum age of a webhook signature timestamp, in seconds
    pub webhook_tolerance_secs: i64,
}

/// Stripe price IDs for subscription tiers
/// Enterprise is custom-priced and never has one
#[derive(Debug, Clone, Default)]
pub struct PriceIds {
    pub student: Option<String>,
    pub professional: Option<String>,
}

impl StripeConfig {
    /// Get price ID for a tier; blank values count as unconfigured
    pub fn price_id_for_tier(&self, tier: Tier) -> Option<&str> {
        let price_id = match tier {
            Tier::Student => self.price_ids.student.as_deref(),
            Tier::Professional => self.price_ids.professional.as_deref(),
            Tier::Enterprise => None,
        };
        price_id.map(str::trim).filter(|id| !id.is_empty())
    }

    fn base_url(&self) -> &str {
        self.app_base_url.trim_end_matches('/')
    }

    /// Where the provider sends the customer after payment
    pub fn success_url(&self) -> String {
        format!(
            "{}/purchase/success?session_id={}",
            self.base_url(),
            CHECKOUT_SESSION_ID_PLACEHOLDER
        )
    }

    /// Where the provider sends the customer when they back out
    pub fn cancel_url(&self) -> String {
        format!("{}/purchase", self.base_url())
    }
}

/// Stripe billing client
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client for a secret key
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

/// Translate a checkout request into Stripe create parameters
pub(crate) fn session_params(request: &CheckoutRequest) -> CreateCheckoutSession<'_> {
    let line_items = request
        .line_items
        .iter()
        .map(|item| CreateCheckoutSessionLineItems {
            price: Some(item.price.clone()),
            quantity: Some(item.quantity),
            ..Default::default()
        })
        .collect();

    CreateCheckoutSession {
        mode: Some(match request.mode {
            CheckoutMode::Subscription => CheckoutSessionMode::Subscription,
        }),
        line_items: Some(line_items),
        payment_method_types: Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]),
        success_url: Some(&request.success_url),
        cancel_url: Some(&request.cancel_url),
        metadata: Some(request.metadata.clone()),
        ..Default::default()
    }
}

/// Re-read a Stripe session through our own shape so only the fields we
/// display are required
pub(crate) fn session_details(session: &CheckoutSession) -> BillingResult<CheckoutSessionDetails> {
    let value = serde_json::to_value(session)
        .map_err(|e| BillingError::StripeApi(format!("Unreadable session: {}", e)))?;
    serde_json::from_value(value)
        .map_err(|e| BillingError::StripeApi(format!("Unreadable session: {}", e)))
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BillingResult<CreatedSession> {
        let session = CheckoutSession::create(&self.client, session_params(&request)).await?;

        Ok(CreatedSession {
            id: session.id.to_string(),
            url: session.url,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
        expand: &[&str],
    ) -> BillingResult<CheckoutSessionDetails> {
        let session_id = session_id
            .parse::<CheckoutSessionId>()
            .map_err(|e| BillingError::StripeApi(format!("Invalid session ID: {}", e)))?;

        let session = CheckoutSession::retrieve(&self.client, &session_id, expand).await?;
        session_details(&session)
    }
}
