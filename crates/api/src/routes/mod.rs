//! API routes

pub mod billing;
pub mod health;
pub mod pricing;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::{security::security_headers_middleware, state::AppState};

/// Stripe event payloads are small; anything larger is not a webhook
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // JSON API - under /api/v1
    let api_v1_routes = Router::new()
        .route("/pricing", get(pricing::list_tiers))
        .route("/billing/checkout", post(billing::create_checkout));

    // Browser-facing purchase flow (form post and provider return URL)
    let purchase_routes = Router::new()
        .route("/purchase/checkout", post(billing::checkout_redirect))
        .route("/purchase/success", get(billing::checkout_success));

    let mut app = Router::new()
        .merge(health_routes)
        .merge(purchase_routes)
        .nest("/api/v1", api_v1_routes);

    // Stripe webhook (public, uses signature verification) - only when billing is enabled
    if state.config.enable_billing {
        app = app.route("/api/webhooks/stripe", post(billing::webhook));
    } else {
        tracing::warn!("Billing disabled; Stripe webhook route not mounted");
    }

    let cors = cors_layer(&state.config.cors_allowed_origins);

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
