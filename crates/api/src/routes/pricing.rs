//! Pricing catalog

use axum::{extract::State, Json};
use serde::Serialize;
use wdi_shared::{Tier, TierPrice};

use crate::state::AppState;

/// How a tier is bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMode {
    /// Hosted checkout is available
    Checkout,
    /// Custom pricing, routed to the contact form
    Contact,
    /// Checkout is disabled or the tier has no configured price
    Unavailable,
}

#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub name: &'static str,
    pub price: TierPrice,
    pub price_label: String,
    pub features: &'static [&'static str],
    pub purchase: PurchaseMode,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub tiers: Vec<TierInfo>,
}

/// List subscription tiers for the pricing page
pub async fn list_tiers(State(state): State<AppState>) -> Json<PricingResponse> {
    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| {
            let purchase = if tier.is_custom() {
                PurchaseMode::Contact
            } else {
                match &state.billing {
                    Some(billing) if billing.checkout.config().price_id_for_tier(tier).is_some() => {
                        PurchaseMode::Checkout
                    }
                    _ => PurchaseMode::Unavailable,
                }
            };

            TierInfo {
                tier,
                name: tier.display_name(),
                price: tier.price(),
                price_label: tier.price().label(),
                features: tier.features(),
                purchase,
            }
        })
        .collect();

    Json(PricingResponse { tiers })
}
