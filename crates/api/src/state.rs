//! Shared application state

use std::sync::Arc;

use wdi_billing::{BillingService, LoggingFulfillmentStore};

use crate::config::Config;

/// State handed to every handler. Holds no mutable data; each request is
/// served independently.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present only when billing is enabled
    pub billing: Option<Arc<BillingService>>,
}

impl AppState {
    /// Build state with the Stripe-backed billing service
    pub fn new(config: Config) -> Self {
        let billing = config.enable_billing.then(|| {
            BillingService::new(config.stripe_config(), Arc::new(LoggingFulfillmentStore))
        });
        Self::with_billing(config, billing)
    }

    /// Build state around an already constructed billing service
    pub fn with_billing(config: Config, billing: Option<BillingService>) -> Self {
        Self {
            config: Arc::new(config),
            billing: billing.map(Arc::new),
        }
    }
}
