//! Typed Stripe webhook events
//!
//! A verified payload is decoded into a [`WebhookEvent`] before dispatch. Each
//! handled event type gets its own variant carrying only the fields the site
//! acts on; anything else is kept as [`WebhookEventKind::Other`].
//!
//! ## Handled event types
//!
//! - Checkout: `checkout.session.completed`
//! - Subscription lifecycle: `customer.subscription.created`, `.updated`, `.deleted`
//! - Invoicing: `invoice.paid`, `invoice.payment_failed`
//! - Payment intents: `payment_intent.succeeded`, `payment_intent.payment_failed`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::ObjectRef;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_CREATED: &str = "customer.subscription.created";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";
pub const INVOICE_PAID: &str = "invoice.paid";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";
pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";

/// A verified webhook notification
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    /// Provider event id, the idempotency key for fulfillment
    pub id: String,
    /// Unix timestamp of the provider-side state change
    pub created: i64,
    pub livemode: bool,
    pub kind: WebhookEventKind,
}

/// Event payload, one variant per handled type
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEventKind {
    CheckoutSessionCompleted(CompletedCheckout),
    SubscriptionCreated(SubscriptionSnapshot),
    SubscriptionUpdated(SubscriptionSnapshot),
    SubscriptionDeleted(SubscriptionSnapshot),
    InvoicePaid(InvoiceSnapshot),
    InvoicePaymentFailed(InvoiceSnapshot),
    PaymentIntentSucceeded(PaymentIntentSnapshot),
    PaymentIntentFailed(PaymentIntentSnapshot),
    /// Unhandled event type, acknowledged without action
    Other(String),
}

impl WebhookEventKind {
    /// Provider type tag, e.g. `invoice.paid`
    pub fn event_type(&self) -> &str {
        match self {
            Self::CheckoutSessionCompleted(_) => CHECKOUT_SESSION_COMPLETED,
            Self::SubscriptionCreated(_) => SUBSCRIPTION_CREATED,
            Self::SubscriptionUpdated(_) => SUBSCRIPTION_UPDATED,
            Self::SubscriptionDeleted(_) => SUBSCRIPTION_DELETED,
            Self::InvoicePaid(_) => INVOICE_PAID,
            Self::InvoicePaymentFailed(_) => INVOICE_PAYMENT_FAILED,
            Self::PaymentIntentSucceeded(_) => PAYMENT_INTENT_SUCCEEDED,
            Self::PaymentIntentFailed(_) => PAYMENT_INTENT_FAILED,
            Self::Other(event_type) => event_type,
        }
    }

    /// Decode `data.object` for the given type tag
    pub fn decode(event_type: &str, object: Value) -> Result<Self, serde_json::Error> {
        let kind = match event_type {
            CHECKOUT_SESSION_COMPLETED => {
                Self::CheckoutSessionCompleted(serde_json::from_value(object)?)
            }
            SUBSCRIPTION_CREATED => Self::SubscriptionCreated(serde_json::from_value(object)?),
            SUBSCRIPTION_UPDATED => Self::SubscriptionUpdated(serde_json::from_value(object)?),
            SUBSCRIPTION_DELETED => Self::SubscriptionDeleted(serde_json::from_value(object)?),
            INVOICE_PAID => Self::InvoicePaid(serde_json::from_value(object)?),
            INVOICE_PAYMENT_FAILED => Self::InvoicePaymentFailed(serde_json::from_value(object)?),
            PAYMENT_INTENT_SUCCEEDED => {
                Self::PaymentIntentSucceeded(serde_json::from_value(object)?)
            }
            PAYMENT_INTENT_FAILED => Self::PaymentIntentFailed(serde_json::from_value(object)?),
            other => Self::Other(other.to_string()),
        };
        Ok(kind)
    }
}

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    livemode: bool,
    data: RawEventData,
}

#[derive(Deserialize)]
struct RawEventData {
    object: Value,
}

impl WebhookEvent {
    /// Decode a raw event envelope
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        let raw: RawEvent = serde_json::from_str(payload)?;
        let kind = WebhookEventKind::decode(&raw.type_, raw.data.object)?;
        Ok(Self {
            id: raw.id,
            created: raw.created,
            livemode: raw.livemode,
            kind,
        })
    }

    pub fn event_type(&self) -> &str {
        self.kind.event_type()
    }
}

/// `checkout.session.completed` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletedCheckout {
    pub id: String,
    #[serde(default)]
    pub customer: Option<ObjectRef>,
    #[serde(default)]
    pub subscription: Option<ObjectRef>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, Value>>,
}

impl CompletedCheckout {
    /// Tier tag attached when the session was created
    pub fn tier(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get("tier"))
            .and_then(Value::as_str)
    }
}

/// Subscription state carried by `customer.subscription.*`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionSnapshot {
    pub id: String,
    #[serde(default)]
    pub customer: Option<ObjectRef>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// Provider subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    Paused,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Paused => "paused",
            Self::Unknown => "unknown",
        }
    }
}

/// Invoice state carried by `invoice.*`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvoiceSnapshot {
    pub id: String,
    #[serde(default)]
    pub customer: Option<ObjectRef>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub subscription: Option<ObjectRef>,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub attempt_count: u32,
}

/// Payment intent state carried by `payment_intent.*`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentSnapshot {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
