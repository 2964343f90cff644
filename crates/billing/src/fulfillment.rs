//! Fulfillment of verified webhook events
//!
//! The webhook receiver's job ends at a verified, typed event. What happens to
//! it next belongs to a [`FulfillmentStore`]. The provider delivers at least
//! once and in no particular order, so implementations must treat
//! `apply_event` as idempotent per event id.

use async_trait::async_trait;

use crate::error::BillingResult;
use crate::events::WebhookEventKind;
use crate::provider::ObjectRef;

/// Consumer of verified webhook events
#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    /// Apply an event. Applying the same `event_id` twice must leave the same
    /// end state as applying it once.
    async fn apply_event(&self, event_id: &str, kind: &WebhookEventKind) -> BillingResult<()>;
}

fn ref_id(object: &Option<ObjectRef>) -> &str {
    object.as_ref().map(ObjectRef::id).unwrap_or("unknown")
}

/// Store that records fulfillment decisions in the log only.
///
/// Used until subscriptions are persisted; it has no state, so replays are
/// trivially idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFulfillmentStore;

#[async_trait]
impl FulfillmentStore for LoggingFulfillmentStore {
    async fn apply_event(&self, event_id: &str, kind: &WebhookEventKind) -> BillingResult<()> {
        match kind {
            WebhookEventKind::CheckoutSessionCompleted(session) => {
                tracing::info!(
                    event_id = %event_id,
                    session_id = %session.id,
                    customer_id = %ref_id(&session.customer),
                    subscription_id = %ref_id(&session.subscription),
                    tier = session.tier().unwrap_or("unknown"),
                    "Provisioning subscription for completed checkout"
                );
            }
            WebhookEventKind::SubscriptionCreated(subscription)
            | WebhookEventKind::SubscriptionUpdated(subscription)
            | WebhookEventKind::SubscriptionDeleted(subscription) => {
                tracing::info!(
                    event_id = %event_id,
                    event_type = kind.event_type(),
                    subscription_id = %subscription.id,
                    customer_id = %ref_id(&subscription.customer),
                    status = subscription.status.as_str(),
                    cancel_at_period_end = subscription.cancel_at_period_end,
                    "Mirroring subscription status"
                );
            }
            WebhookEventKind::InvoicePaid(invoice) => {
                tracing::info!(
                    event_id = %event_id,
                    invoice_id = %invoice.id,
                    customer_id = %ref_id(&invoice.customer),
                    amount_paid = invoice.amount_paid,
                    currency = invoice.currency.as_deref().unwrap_or("usd"),
                    "Recording invoice payment"
                );
            }
            WebhookEventKind::InvoicePaymentFailed(invoice) => {
                tracing::warn!(
                    event_id = %event_id,
                    invoice_id = %invoice.id,
                    customer_id = %ref_id(&invoice.customer),
                    amount_due = invoice.amount_due,
                    attempt_count = invoice.attempt_count,
                    "Flagging account past due"
                );
                tracing::info!(
                    event_id = %event_id,
                    customer_email = invoice.customer_email.as_deref().unwrap_or("unknown"),
                    "Queueing payment failure notification"
                );
            }
            WebhookEventKind::PaymentIntentSucceeded(_)
            | WebhookEventKind::PaymentIntentFailed(_)
            | WebhookEventKind::Other(_) => {
                tracing::debug!(
                    event_id = %event_id,
                    event_type = kind.event_type(),
                    "No fulfillment action for event"
                );
            }
        }
        Ok(())
    }
}
