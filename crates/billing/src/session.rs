//! Checkout confirmation
//!
//! Reads a finished checkout session when the customer lands back on the
//! success page. Every call goes to the provider; nothing is cached.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{BillingError, BillingResult};
use crate::provider::{CheckoutProvider, CheckoutSessionDetails, PaymentStatus};

/// Sub-resources expanded on retrieval
pub const SESSION_EXPAND: [&str; 2] = ["line_items", "customer"];

/// Confirmation details for a paid session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaidSession {
    pub session_id: String,
    pub customer_email: Option<String>,
    pub items: Vec<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

impl From<CheckoutSessionDetails> for PaidSession {
    fn from(session: CheckoutSessionDetails) -> Self {
        let customer_email = session.email().map(str::to_string);
        let items = session
            .line_items
            .map(|list| {
                list.data
                    .into_iter()
                    .filter_map(|item| item.description)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            session_id: session.id,
            customer_email,
            items,
            amount_total: session.amount_total,
            currency: session.currency,
        }
    }
}

/// Outcome of a returning checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Paid(PaidSession),
    NotPaid {
        session_id: String,
        payment_status: PaymentStatus,
    },
}

/// Reads checkout sessions back from the provider
pub struct SessionStatusReader {
    provider: Arc<dyn CheckoutProvider>,
}

impl SessionStatusReader {
    pub fn new(provider: Arc<dyn CheckoutProvider>) -> Self {
        Self { provider }
    }

    /// Confirm the outcome of the session named by the `session_id` query parameter
    pub async fn read_status(&self, session_id: Option<&str>) -> BillingResult<SessionOutcome> {
        let session_id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Checkout confirmation requested without a session id");
                BillingError::SessionLookup("missing session_id".to_string())
            })?;

        let session = self
            .provider
            .retrieve_checkout_session(session_id, &SESSION_EXPAND)
            .await
            .map_err(|e| {
                tracing::error!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to retrieve checkout session"
                );
                BillingError::SessionLookup(e.to_string())
            })?;

        match session.payment_status {
            PaymentStatus::Paid => {
                tracing::info!(session_id = %session.id, "Checkout session confirmed as paid");
                Ok(SessionOutcome::Paid(session.into()))
            }
            status => {
                tracing::warn!(
                    session_id = %session.id,
                    payment_status = status.as_str(),
                    "Checkout session is not paid"
                );
                Ok(SessionOutcome::NotPaid {
                    session_id: session.id,
                    payment_status: status,
                })
            }
        }
    }
}
