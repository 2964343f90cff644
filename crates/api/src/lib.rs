//! Web Design Initiative purchase API
//!
//! HTTP surface for the pricing page: tier listing, checkout start, the
//! post-payment confirmation view and the Stripe webhook endpoint.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod routes;
pub mod security;
pub mod state;

pub use config::{Config, ConfigError, LogFormat};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
