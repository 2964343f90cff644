//! Core types shared across the site

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

// =============================================================================
// Enums
// =============================================================================

/// Subscription tier offered on the pricing page
/// Tier hierarchy: Student ($20) → Professional ($100) → Enterprise (custom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Student,
    Professional,
    Enterprise,
}

impl Tier {
    /// Every tier in pricing-page order
    pub const ALL: [Tier; 3] = [Tier::Student, Tier::Professional, Tier::Enterprise];

    /// Lowercase tag used in requests, metadata and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Professional => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Price per billing period
    pub fn price(&self) -> TierPrice {
        match self {
            Self::Student => TierPrice::Monthly { cents: 2_000 },
            Self::Professional => TierPrice::Monthly { cents: 10_000 },
            Self::Enterprise => TierPrice::Custom,
        }
    }

    /// Services included in the tier
    pub fn features(&self) -> &'static [&'static str] {
        match self {
            Self::Student => &[
                "5 Pages",
                "Responsive Design",
                "Basic SEO",
                "SSL Certificate",
                "Email Support",
                "1-Month Revisions",
            ],
            Self::Professional => &[
                "15 Pages",
                "Advanced Analytics",
                "Blog System",
                "Premium SEO",
                "Priority Support",
                "Unlimited Revisions",
                "3-Month Updates",
            ],
            Self::Enterprise => &[
                "Unlimited Pages",
                "Custom Features",
                "Advanced Integrations",
                "Dedicated Support",
                "CRM/Database Setup",
                "1-Year Support",
                "Weekly Optimization",
            ],
        }
    }

    /// Custom-priced tiers are sold through the contact form, never through checkout
    pub fn is_custom(&self) -> bool {
        matches!(self.price(), TierPrice::Custom)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(SiteError::UnknownTier(s.to_string())),
        }
    }
}

/// Price of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TierPrice {
    /// Fixed monthly subscription price in USD cents
    Monthly { cents: i64 },
    /// Quoted per project
    Custom,
}

impl TierPrice {
    /// Label shown on the pricing page, e.g. `$20/month`
    pub fn label(&self) -> String {
        match self {
            Self::Monthly { cents } if cents % 100 == 0 => format!("${}/month", cents / 100),
            Self::Monthly { cents } => format!("${}.{:02}/month", cents / 100, cents % 100),
            Self::Custom => "Custom".to_string(),
        }
    }
}
