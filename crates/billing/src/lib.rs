// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![recursion_limit = "256"]

//! Web Design Initiative Billing Module
//!
//! Handles the Stripe checkout lifecycle for the pricing page.
//!
//! ## Features
//!
//! - **Checkout**: Resolve a tier to its price and open a hosted checkout session
//! - **Redirects**: Send the browser to the hosted page or the contact form
//! - **Confirmation**: Read a returning session and report the payment outcome
//! - **Webhooks**: Verify Stripe signatures and dispatch typed events to fulfillment

pub mod checkout;
pub mod client;
pub mod error;
pub mod events;
pub mod fulfillment;
pub mod provider;
pub mod redirect;
pub mod session;
pub mod webhooks;

// Checkout
pub use checkout::{CheckoutOutcome, CheckoutService};

// Client
pub use client::{
    PriceIds, StripeClient, StripeConfig, CHECKOUT_SESSION_ID_PLACEHOLDER,
    DEFAULT_WEBHOOK_TOLERANCE_SECS,
};

// Error
pub use error::{BillingError, BillingResult};

// Events
pub use events::{
    CompletedCheckout, InvoiceSnapshot, PaymentIntentSnapshot, SubscriptionSnapshot,
    SubscriptionStatus, WebhookEvent, WebhookEventKind,
};

// Fulfillment
pub use fulfillment::{FulfillmentStore, LoggingFulfillmentStore};

// Provider
pub use provider::{
    CheckoutLineItem, CheckoutMode, CheckoutProvider, CheckoutRequest, CheckoutSessionDetails,
    CreatedSession, ObjectRef, PaymentStatus,
};

// Redirect
pub use redirect::{CheckoutRedirect, Navigation, CONTACT_PATH};

// Session
pub use session::{PaidSession, SessionOutcome, SessionStatusReader, SESSION_EXPAND};

// Webhooks
pub use webhooks::{WebhookDisposition, WebhookHandler, SIGNATURE_HEADER};

use std::sync::Arc;

/// Main billing service that combines all billing functionality
pub struct BillingService {
    pub checkout: CheckoutService,
    pub sessions: SessionStatusReader,
    pub webhooks: WebhookHandler,
}

impl BillingService {
    /// Create a billing service backed by the Stripe API
    pub fn new(config: StripeConfig, store: Arc<dyn FulfillmentStore>) -> Self {
        let stripe: Arc<dyn CheckoutProvider> = Arc::new(StripeClient::new(&config.secret_key));
        Self::with_provider(config, stripe, store)
    }

    /// Create a billing service over an explicit provider
    pub fn with_provider(
        config: StripeConfig,
        provider: Arc<dyn CheckoutProvider>,
        store: Arc<dyn FulfillmentStore>,
    ) -> Self {
        let webhooks = WebhookHandler::new(
            config.webhook_secret.clone(),
            config.webhook_tolerance_secs,
            store,
        );

        Self {
            checkout: CheckoutService::new(provider.clone(), config),
            sessions: SessionStatusReader::new(provider),
            webhooks,
        }
    }
}
