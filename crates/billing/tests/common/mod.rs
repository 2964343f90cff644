//! Test doubles for the provider and fulfillment seams

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use wdi_billing::{
    BillingError, BillingResult, BillingService, CheckoutProvider, CheckoutRequest,
    CheckoutSessionDetails, CreatedSession, FulfillmentStore, PriceIds, StripeConfig,
    WebhookEventKind, DEFAULT_WEBHOOK_TOLERANCE_SECS,
};

pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";

pub fn test_config() -> StripeConfig {
    StripeConfig {
        secret_key: "sk_test_xxx".to_string(),
        webhook_secret: WEBHOOK_SECRET.to_string(),
        price_ids: PriceIds {
            student: Some("price_abc".to_string()),
            professional: None,
        },
        app_base_url: "http://localhost:3000".to_string(),
        webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
    }
}

/// Provider fake that records every call
#[derive(Default)]
pub struct FakeProvider {
    pub created: Mutex<Vec<CheckoutRequest>>,
    pub retrieved: Mutex<Vec<(String, Vec<String>)>>,
    pub create_result: Mutex<Option<BillingResult<CreatedSession>>>,
    pub session: Mutex<Option<serde_json::Value>>,
}

impl FakeProvider {
    pub fn with_session_url(url: &str) -> Self {
        let provider = Self::default();
        *provider.create_result.lock().unwrap() = Some(Ok(CreatedSession {
            id: "cs_test_123".to_string(),
            url: Some(url.to_string()),
        }));
        provider
    }

    pub fn failing_create() -> Self {
        let provider = Self::default();
        *provider.create_result.lock().unwrap() = Some(Err(BillingError::StripeApi(
            "No such price: 'price_abc'".to_string(),
        )));
        provider
    }

    pub fn with_session(session: serde_json::Value) -> Self {
        let provider = Self::default();
        *provider.session.lock().unwrap() = Some(session);
        provider
    }

    pub fn call_count(&self) -> usize {
        self.created.lock().unwrap().len() + self.retrieved.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BillingResult<CreatedSession> {
        self.created.lock().unwrap().push(request);
        match self.create_result.lock().unwrap().as_ref() {
            Some(Ok(session)) => Ok(session.clone()),
            Some(Err(e)) => Err(BillingError::StripeApi(e.to_string())),
            None => Err(BillingError::StripeApi("provider unavailable".to_string())),
        }
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
        expand: &[&str],
    ) -> BillingResult<CheckoutSessionDetails> {
        self.retrieved.lock().unwrap().push((
            session_id.to_string(),
            expand.iter().map(|s| s.to_string()).collect(),
        ));
        match self.session.lock().unwrap().clone() {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| BillingError::StripeApi(e.to_string())),
            None => Err(BillingError::StripeApi(format!(
                "No such checkout.session: '{}'",
                session_id
            ))),
        }
    }
}

/// Store fake keyed by event id, so replays overwrite instead of accumulating
#[derive(Default)]
pub struct RecordingStore {
    pub applied: Mutex<BTreeMap<String, String>>,
    pub calls: Mutex<usize>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl FulfillmentStore for RecordingStore {
    async fn apply_event(&self, event_id: &str, kind: &WebhookEventKind) -> BillingResult<()> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(BillingError::Fulfillment("store unavailable".to_string()));
        }
        self.applied
            .lock()
            .unwrap()
            .insert(event_id.to_string(), kind.event_type().to_string());
        Ok(())
    }
}

pub fn service(provider: Arc<FakeProvider>, store: Arc<RecordingStore>) -> BillingService {
    BillingService::with_provider(test_config(), provider, store)
}

/// Build a `Stripe-Signature` header for a payload
pub fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
    type HmacSha256 = Hmac<Sha256>;

    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

pub fn event_payload(event_id: &str, event_type: &str, object: serde_json::Value) -> String {
    serde_json::json!({
        "id": event_id,
        "object": "event",
        "type": event_type,
        "created": 1_700_000_000,
        "livemode": false,
        "data": { "object": object }
    })
    .to_string()
}
