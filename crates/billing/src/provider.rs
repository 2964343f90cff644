//! Payment provider seam
//!
//! Services talk to the hosted checkout API through [`CheckoutProvider`] so the
//! Stripe client can be swapped for a fake in tests. Requests and sessions are
//! described with plain types owned by this crate rather than SDK objects.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BillingResult;

/// Checkout session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// Recurring subscription billed by the provider
    Subscription,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
        }
    }
}

/// A single priced line item on a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    pub price: String,
    pub quantity: u64,
}

/// Parameters for a new hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub mode: CheckoutMode,
    pub line_items: Vec<CheckoutLineItem>,
    /// Must contain the `{CHECKOUT_SESSION_ID}` placeholder
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// Session returned by the provider on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub id: String,
    /// Hosted payment page; the provider may omit it for sessions that are not open
    pub url: Option<String>,
}

/// Payment status of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Unknown => "unknown",
        }
    }
}

/// Reference to a provider object: either its id or the expanded object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ObjectRef {
    Id(String),
    Object {
        id: String,
        #[serde(default)]
        email: Option<String>,
    },
}

impl ObjectRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object { id, .. } => id,
        }
    }

    /// Email of an expanded customer object
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Object { email, .. } => email.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionLineItem {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub amount_total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LineItemList {
    #[serde(default)]
    pub data: Vec<SessionLineItem>,
}

/// A finalized checkout session as seen when the customer returns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSessionDetails {
    pub id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub customer: Option<ObjectRef>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Option<LineItemList>,
}

impl CheckoutSessionDetails {
    /// Best available customer email: checkout-collected details, then the
    /// prefilled email, then the expanded customer
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.as_deref())
            .or(self.customer_email.as_deref())
            .or_else(|| self.customer.as_ref().and_then(ObjectRef::email))
    }
}

/// Hosted checkout API
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session
    async fn create_checkout_session(&self, request: CheckoutRequest)
        -> BillingResult<CreatedSession>;

    /// Retrieve a checkout session, expanding the named sub-resources
    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
        expand: &[&str],
    ) -> BillingResult<CheckoutSessionDetails>;
}
