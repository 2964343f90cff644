//! Stripe webhook handling
//!
//! Verifies the `Stripe-Signature` header against the raw request body,
//! decodes the typed event and dispatches it to the fulfillment store.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;

use crate::error::{BillingError, BillingResult};
use crate::events::{WebhookEvent, WebhookEventKind};
use crate::fulfillment::FulfillmentStore;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// What dispatch did with a verified event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// Handed to the fulfillment store
    Fulfilled,
    /// Logged only
    Observed,
    /// Unhandled type, acknowledged without action
    Ignored,
}

/// Parsed `t=…,v1=…` signature header
#[derive(Debug, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parse the header; only `v1` entries are kept and undecodable ones are skipped
    fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = value.parse().ok(),
                "v1" => {
                    if let Ok(bytes) = hex::decode(value) {
                        signatures.push(bytes);
                    }
                }
                _ => {}
            }
        }

        Some(Self {
            timestamp: timestamp?,
            signatures,
        })
    }
}

/// Webhook handler for Stripe events
pub struct WebhookHandler {
    webhook_secret: String,
    tolerance_secs: i64,
    store: Arc<dyn FulfillmentStore>,
}

impl WebhookHandler {
    pub fn new(
        webhook_secret: impl Into<String>,
        tolerance_secs: i64,
        store: Arc<dyn FulfillmentStore>,
    ) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            tolerance_secs,
            store,
        }
    }

    /// Verify and parse a Stripe webhook event
    pub fn verify_event(&self, payload: &str, signature: &str) -> BillingResult<WebhookEvent> {
        self.verify_event_at(payload, signature, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Verify and parse a Stripe webhook event against an explicit clock
    pub fn verify_event_at(
        &self,
        payload: &str,
        signature: &str,
        now: i64,
    ) -> BillingResult<WebhookEvent> {
        self.verify_signature_at(payload, signature, now)?;

        let event = WebhookEvent::from_json(payload).map_err(|e| {
            tracing::error!(parse_error = %e, "Failed to parse webhook event JSON");
            BillingError::WebhookSignatureInvalid
        })?;

        tracing::debug!(
            event_type = %event.event_type(),
            event_id = %event.id,
            "Webhook event decoded"
        );

        Ok(event)
    }

    /// Check the signature header against the raw payload.
    ///
    /// The expected signature is hex HMAC-SHA256 of `"{t}.{payload}"` keyed
    /// with the webhook secret; any matching `v1` entry is accepted.
    pub fn verify_signature_at(
        &self,
        payload: &str,
        signature: &str,
        now: i64,
    ) -> BillingResult<()> {
        if self.webhook_secret.is_empty() {
            tracing::error!("Webhook secret is not configured");
            return Err(BillingError::WebhookSignatureInvalid);
        }

        let header = SignatureHeader::parse(signature).ok_or_else(|| {
            tracing::warn!("Missing timestamp in signature header");
            BillingError::WebhookSignatureInvalid
        })?;

        if header.signatures.is_empty() {
            tracing::warn!("Missing v1 signature in signature header");
            return Err(BillingError::WebhookSignatureInvalid);
        }

        let age = now.saturating_sub(header.timestamp).saturating_abs();
        if age > self.tolerance_secs {
            tracing::warn!(
                timestamp = header.timestamp,
                now = now,
                diff = age,
                "Webhook timestamp outside tolerance"
            );
            return Err(BillingError::WebhookSignatureInvalid);
        }

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes()).map_err(|_| {
            tracing::error!("Invalid webhook secret key");
            BillingError::WebhookSignatureInvalid
        })?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        let matched = header
            .signatures
            .iter()
            .any(|candidate| bool::from(expected.as_slice().ct_eq(candidate.as_slice())));

        if !matched {
            tracing::warn!(
                payload_len = payload.len(),
                candidates = header.signatures.len(),
                "Webhook signature mismatch"
            );
            return Err(BillingError::WebhookSignatureInvalid);
        }

        Ok(())
    }

    /// Dispatch a verified event.
    ///
    /// Store failures propagate so the caller answers with a retryable status.
    pub async fn handle_event(&self, event: WebhookEvent) -> BillingResult<WebhookDisposition> {
        tracing::info!(
            event_type = %event.event_type(),
            event_id = %event.id,
            livemode = event.livemode,
            "Processing Stripe webhook event"
        );

        match &event.kind {
            WebhookEventKind::CheckoutSessionCompleted(_)
            | WebhookEventKind::SubscriptionCreated(_)
            | WebhookEventKind::SubscriptionUpdated(_)
            | WebhookEventKind::SubscriptionDeleted(_)
            | WebhookEventKind::InvoicePaid(_)
            | WebhookEventKind::InvoicePaymentFailed(_) => {
                self.store
                    .apply_event(&event.id, &event.kind)
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            event_id = %event.id,
                            event_type = %event.event_type(),
                            error = %e,
                            "Fulfillment failed for webhook event"
                        );
                        e
                    })?;
                Ok(WebhookDisposition::Fulfilled)
            }
            WebhookEventKind::PaymentIntentSucceeded(intent) => {
                tracing::info!(
                    event_id = %event.id,
                    payment_intent_id = %intent.id,
                    amount = intent.amount,
                    "Payment succeeded"
                );
                Ok(WebhookDisposition::Observed)
            }
            WebhookEventKind::PaymentIntentFailed(intent) => {
                tracing::warn!(
                    event_id = %event.id,
                    payment_intent_id = %intent.id,
                    status = intent.status.as_deref().unwrap_or("unknown"),
                    "Payment failed"
                );
                Ok(WebhookDisposition::Observed)
            }
            WebhookEventKind::Other(event_type) => {
                tracing::info!(
                    event_type = %event_type,
                    event_id = %event.id,
                    "Received unhandled Stripe event type - no handler configured"
                );
                Ok(WebhookDisposition::Ignored)
            }
        }
    }
}
