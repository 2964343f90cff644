//! Where the browser goes after a checkout is started

use serde::Serialize;

use crate::checkout::CheckoutOutcome;

/// In-app path of the contact form used for custom-priced tiers
pub const CONTACT_PATH: &str = "/contact";

/// Navigation kind the front-end must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Route change inside the site
    InApp,
    /// Full-page load of an external origin; control passes to the provider
    External,
}

/// Redirect target for a checkout outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub navigation: Navigation,
    pub location: String,
}

impl CheckoutRedirect {
    pub fn is_contact_form(&self) -> bool {
        self.navigation == Navigation::InApp
    }
}

impl From<&CheckoutOutcome> for CheckoutRedirect {
    fn from(outcome: &CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::ContactForm => Self {
                navigation: Navigation::InApp,
                location: CONTACT_PATH.to_string(),
            },
            CheckoutOutcome::Hosted { url, .. } => Self {
                navigation: Navigation::External,
                location: url.clone(),
            },
        }
    }
}
