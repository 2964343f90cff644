//! Billing routes for Stripe integration

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wdi_billing::{
    BillingError, BillingService, CheckoutOutcome, CheckoutRedirect, Navigation, SessionOutcome,
    SIGNATURE_HEADER,
};
use wdi_shared::Tier;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Pricing page to send customers back to after a failed checkout
pub const PRICING_PATH: &str = "/purchase";

/// Pricing page with the "try again" banner raised
pub const CHECKOUT_RETRY_PATH: &str = "/purchase?error=checkout";

/// Request to create a checkout session
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub tier: String,
}

/// Response from creating a checkout session
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: Option<String>,
    pub is_contact_form: bool,
    pub navigation: Navigation,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        let redirect = CheckoutRedirect::from(&outcome);
        let session_id = match outcome {
            CheckoutOutcome::Hosted { session_id, .. } => Some(session_id),
            CheckoutOutcome::ContactForm => None,
        };

        Self {
            is_contact_form: redirect.is_contact_form(),
            navigation: redirect.navigation,
            url: redirect.location,
            session_id,
        }
    }
}

fn billing(state: &AppState) -> ApiResult<&BillingService> {
    state
        .billing
        .as_deref()
        .ok_or(ApiError::ServiceUnavailable)
}

async fn start_checkout(state: &AppState, tier: &str) -> ApiResult<CheckoutOutcome> {
    let billing = billing(state)?;

    let tier: Tier = tier.parse().map_err(|e| {
        tracing::warn!(tier = %tier, "Checkout requested for unknown tier");
        BillingError::from(e)
    })?;

    Ok(billing.checkout.create_checkout_session(tier).await?)
}

/// Create a checkout session for a script-driven pricing page
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let outcome = start_checkout(&state, &req.tier).await?;
    Ok(Json(outcome.into()))
}

/// Start checkout from a plain form post and redirect the browser.
///
/// The contact form is a route inside the site; the hosted page is a
/// full-page hop to the provider, after which nothing calls back here.
/// Failures send the browser back to the pricing page to try again.
pub async fn checkout_redirect(
    State(state): State<AppState>,
    Form(req): Form<CreateCheckoutRequest>,
) -> Redirect {
    match start_checkout(&state, &req.tier).await {
        Ok(outcome) => {
            let redirect = CheckoutRedirect::from(&outcome);
            tracing::debug!(
                navigation = ?redirect.navigation,
                location = %redirect.location,
                "Redirecting after checkout start"
            );
            Redirect::to(&redirect.location)
        }
        Err(e) => {
            tracing::warn!(tier = %req.tier, error = %e, "Checkout failed; returning to pricing");
            Redirect::to(CHECKOUT_RETRY_PATH)
        }
    }
}

/// Query string on the success URL
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// What the confirmation page shows
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConfirmationView {
    Success {
        session_id: String,
        customer_email: Option<String>,
        items: Vec<String>,
        amount_total: Option<i64>,
        currency: Option<String>,
        message: String,
    },
    Error {
        message: String,
        retry_url: String,
    },
}

impl ConfirmationView {
    fn failure() -> Self {
        Self::Error {
            message: "Something went wrong with your payment.".to_string(),
            retry_url: PRICING_PATH.to_string(),
        }
    }
}

/// Confirm a checkout when the provider redirects back.
///
/// Every failure renders the same retry view; details are only logged.
pub async fn checkout_success(
    State(state): State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Json<ConfirmationView> {
    let Some(billing) = state.billing.as_deref() else {
        return Json(ConfirmationView::failure());
    };

    let view = match billing.sessions.read_status(query.session_id.as_deref()).await {
        Ok(SessionOutcome::Paid(paid)) => ConfirmationView::Success {
            session_id: paid.session_id,
            customer_email: paid.customer_email,
            items: paid.items,
            amount_total: paid.amount_total,
            currency: paid.currency,
            message: "Thank you for your purchase!".to_string(),
        },
        Ok(SessionOutcome::NotPaid { .. }) | Err(_) => ConfirmationView::failure(),
    };

    Json(view)
}

/// Handle Stripe webhook events
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<Value>> {
    tracing::info!(body_len = body.len(), "Stripe webhook received");

    let billing = billing(&state)?;

    // Get signature header
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Stripe webhook missing signature header");
            ApiError::InvalidWebhookSignature
        })?;

    // Verify against the raw body before anything is parsed
    let event = billing
        .webhooks
        .verify_event(&body, signature)
        .map_err(|e| {
            tracing::warn!(error = ?e, "Stripe webhook signature verification failed");
            ApiError::InvalidWebhookSignature
        })?;

    tracing::info!(
        event_type = %event.event_type(),
        event_id = %event.id,
        "Stripe webhook event verified"
    );

    // Any dispatch failure is retryable for the provider, whatever the store returned
    let disposition = billing.webhooks.handle_event(event).await.map_err(|e| {
        tracing::error!(error = %e, "Webhook handling error");
        ApiError::WebhookProcessing
    })?;

    tracing::info!(disposition = ?disposition, "Stripe webhook processed successfully");

    Ok(Json(json!({ "received": true })))
}
