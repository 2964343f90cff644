//! Router test harness: in-memory provider and store behind a real router

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;
use wdi_api::{create_router, AppState, Config, LogFormat};
use wdi_billing::{
    BillingError, BillingResult, BillingService, CheckoutProvider, CheckoutRequest,
    CheckoutSessionDetails, CreatedSession, FulfillmentStore, WebhookEventKind,
};
use wdi_shared::Tier;

pub const WEBHOOK_SECRET: &str = "whsec_router_test";
pub const HOSTED_URL: &str = "https://checkout.stripe.com/c/pay/cs_test_router";

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        public_url: "http://localhost:3000".to_string(),
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        log_format: LogFormat::Pretty,
        stripe_secret_key: "sk_test_xxx".to_string(),
        stripe_webhook_secret: WEBHOOK_SECRET.to_string(),
        stripe_price_student: Some("price_student".to_string()),
        stripe_price_professional: None,
        stripe_webhook_tolerance_secs: 300,
        enable_billing: true,
    }
}

/// Provider that hands out one fixed session
#[derive(Default)]
pub struct StubProvider {
    pub created: Mutex<Vec<CheckoutRequest>>,
    pub session: Option<serde_json::Value>,
}

impl StubProvider {
    pub fn with_session(session: serde_json::Value) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckoutProvider for StubProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BillingResult<CreatedSession> {
        self.created.lock().unwrap().push(request);
        Ok(CreatedSession {
            id: "cs_test_router".to_string(),
            url: Some(HOSTED_URL.to_string()),
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
        _expand: &[&str],
    ) -> BillingResult<CheckoutSessionDetails> {
        match &self.session {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| BillingError::StripeApi(e.to_string())),
            None => Err(BillingError::StripeApi(format!(
                "No such checkout.session: '{}'",
                session_id
            ))),
        }
    }
}

/// Store that counts applied events, or fails with a chosen error
#[derive(Default)]
pub struct CountingStore {
    pub applied: Mutex<Vec<String>>,
    pub failure: Option<fn() -> BillingError>,
}

impl CountingStore {
    pub fn failing_with(failure: fn() -> BillingError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FulfillmentStore for CountingStore {
    async fn apply_event(&self, event_id: &str, kind: &WebhookEventKind) -> BillingResult<()> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        // Provisioning needs a known tier on the completed session
        if let WebhookEventKind::CheckoutSessionCompleted(session) = kind {
            session.tier().unwrap_or_default().parse::<Tier>()?;
        }
        self.applied.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<StubProvider>,
    pub store: Arc<CountingStore>,
}

impl TestApp {
    pub fn new(provider: StubProvider, store: CountingStore) -> Self {
        let config = test_config();
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let billing =
            BillingService::with_provider(config.stripe_config(), provider.clone(), store.clone());
        let router = create_router(AppState::with_billing(config, Some(billing)));

        Self {
            router,
            provider,
            store,
        }
    }

    pub fn default_app() -> Self {
        Self::new(StubProvider::default(), CountingStore::default())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Router with billing switched off
pub fn billing_disabled() -> Router {
    let mut config = test_config();
    config.enable_billing = false;
    create_router(AppState::with_billing(config, None))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Build a `Stripe-Signature` header for a payload
pub fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
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
