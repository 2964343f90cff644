//! Session initiator tests

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::{service, FakeProvider, RecordingStore};
use wdi_billing::{
    BillingError, CheckoutMode, CheckoutOutcome, CheckoutRedirect, Navigation,
    CHECKOUT_SESSION_ID_PLACEHOLDER,
};
use wdi_shared::Tier;

#[tokio::test]
async fn test_student_checkout_builds_subscription_request() {
    let provider = Arc::new(FakeProvider::with_session_url(
        "https://checkout.stripe.com/c/pay/cs_test_123",
    ));
    let billing = service(provider.clone(), Arc::new(RecordingStore::default()));

    let outcome = billing
        .checkout
        .create_checkout_session(Tier::Student)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CheckoutOutcome::Hosted {
            session_id: "cs_test_123".to_string(),
            url: "https://checkout.stripe.com/c/pay/cs_test_123".to_string(),
        }
    );

    let created = provider.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let request = &created[0];
    assert_eq!(request.mode, CheckoutMode::Subscription);
    assert_eq!(request.mode.as_str(), "subscription");
    assert_eq!(request.line_items.len(), 1);
    assert_eq!(request.line_items[0].price, "price_abc");
    assert_eq!(request.line_items[0].quantity, 1);
    assert!(request.success_url.contains(CHECKOUT_SESSION_ID_PLACEHOLDER));
    assert_eq!(
        request.success_url,
        "http://localhost:3000/purchase/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(request.cancel_url, "http://localhost:3000/purchase");
    assert_eq!(request.metadata.get("tier").map(String::as_str), Some("student"));
}

#[tokio::test]
async fn test_enterprise_routes_to_contact_form_without_provider_call() {
    let provider = Arc::new(FakeProvider::default());
    let billing = service(provider.clone(), Arc::new(RecordingStore::default()));

    let outcome = billing
        .checkout
        .create_checkout_session(Tier::Enterprise)
        .await
        .unwrap();

    assert_eq!(outcome, CheckoutOutcome::ContactForm);
    assert_eq!(provider.call_count(), 0);

    let redirect = CheckoutRedirect::from(&outcome);
    assert_eq!(redirect.navigation, Navigation::InApp);
    assert_eq!(redirect.location, "/contact");
}

#[tokio::test]
async fn test_missing_price_id_is_configuration_error_without_provider_call() {
    let provider = Arc::new(FakeProvider::with_session_url("https://checkout.stripe.com/x"));
    let billing = service(provider.clone(), Arc::new(RecordingStore::default()));

    // Professional has no price configured in the test config
    let err = billing
        .checkout
        .create_checkout_session(Tier::Professional)
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::MissingPriceId(Tier::Professional)));
    assert!(err.is_configuration());
    assert!(err.to_string().contains("professional"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_provider_failure_is_checkout_creation_error() {
    let provider = Arc::new(FakeProvider::failing_create());
    let billing = service(provider.clone(), Arc::new(RecordingStore::default()));

    let err = billing
        .checkout
        .create_checkout_session(Tier::Student)
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::CheckoutCreation(_)));
    assert!(!err.is_configuration());
    assert_eq!(provider.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_without_url_is_checkout_creation_error() {
    let provider = Arc::new(FakeProvider::default());
    *provider.create_result.lock().unwrap() = Some(Ok(wdi_billing::CreatedSession {
        id: "cs_test_no_url".to_string(),
        url: None,
    }));
    let billing = service(provider, Arc::new(RecordingStore::default()));

    let err = billing
        .checkout
        .create_checkout_session(Tier::Student)
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::CheckoutCreation(_)));
}
